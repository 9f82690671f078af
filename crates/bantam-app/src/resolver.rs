use std::time::Duration;

use tracing::warn;

use bantam_core::escalation::EscalationMethod;
use bantam_core::notification::{EscalationStep, Notification, NotificationStep};
use bantam_core::plan::NotificationPlan;
use bantam_core::target::{ContactTarget, TargetScheme};
use bantam_ports::outbound::{
    EscalationPlanRepository, NotificationPlanRepository, TeamRepository,
};

use crate::error::AppError;

/// Turns a bare "notify X with message M" request into a fully resolved
/// [`Notification`]: every plan indirection is expanded here so the engine
/// never touches the store while a notification is in flight.
pub struct PlanResolver<P, T, E>
where
    P: NotificationPlanRepository,
    T: TeamRepository,
    E: EscalationPlanRepository,
{
    plans: P,
    teams: T,
    escalations: E,
}

impl<P, T, E> PlanResolver<P, T, E>
where
    P: NotificationPlanRepository,
    T: TeamRepository,
    E: EscalationPlanRepository,
{
    pub fn new(plans: P, teams: T, escalations: E) -> Self {
        Self {
            plans,
            teams,
            escalations,
        }
    }

    /// A person notification is their own plan wrapped in a single
    /// escalation tier.
    pub async fn resolve_for_person(
        &self,
        username: &str,
        subject: &str,
        message: &str,
    ) -> Result<Notification, AppError> {
        let steps = self.person_steps(username).await?;
        let tier = EscalationStep::new(steps)?;
        Ok(Notification::new(subject.into(), message.into(), vec![tier])?)
    }

    /// A team notification expands the team's escalation plan against its
    /// current member order. Individual tiers that cannot be built are
    /// skipped with a log; only a missing team or escalation plan fails the
    /// resolution.
    pub async fn resolve_for_team(
        &self,
        name: &str,
        subject: &str,
        message: &str,
    ) -> Result<Notification, AppError> {
        let team = self
            .teams
            .find_by_name(name)
            .await?
            .ok_or_else(|| AppError::TeamNotFound(name.into()))?;
        let plan = self
            .escalations
            .find_by_name(&team.escalation_plan)
            .await?
            .ok_or_else(|| AppError::EscalationPlanNotFound(team.escalation_plan.clone()))?;

        let mut tiers = Vec::new();
        // NotifyNextInRotation walks members starting after the on-duty
        // person; the cursor is shared across all occurrences in the plan.
        let mut cursor = 0usize;

        for (index, template) in plan.steps.iter().enumerate() {
            match template.method {
                EscalationMethod::NotifyOnDuty => {
                    let Some(on_duty) = team.members.first() else {
                        warn!(team = name, step = index, "team has no members");
                        continue;
                    };
                    if let Some(tier) = self.person_tier(on_duty, name, index).await {
                        tiers.push(tier);
                    }
                }
                EscalationMethod::NotifyNextInRotation => {
                    cursor += 1;
                    if cursor >= team.members.len() {
                        warn!(
                            team = name,
                            step = index,
                            "no more members available, skipping escalation step"
                        );
                        continue;
                    }
                    if let Some(tier) = self.person_tier(&team.members[cursor], name, index).await {
                        tiers.push(tier);
                    }
                }
                EscalationMethod::NotifyAllInRotation => {
                    if team.members.len() < 2 {
                        warn!(
                            team = name,
                            step = index,
                            "not enough members for all-in-rotation, skipping"
                        );
                        continue;
                    }
                    for member in &team.members[1..] {
                        if let Some(tier) = self.person_tier(member, name, index).await {
                            tiers.push(tier);
                        }
                    }
                }
                EscalationMethod::NotifyOtherPerson => {
                    if let Some(tier) = self.person_tier(&template.target, name, index).await {
                        tiers.push(tier);
                    }
                }
                EscalationMethod::NotifyWebhook => {
                    match Self::template_tier(&template.target, template.wait) {
                        Some(tier) if tier_scheme(&tier) == TargetScheme::Webhook => {
                            tiers.push(tier)
                        }
                        _ => warn!(
                            team = name,
                            step = index,
                            target = %template.target,
                            "webhook step needs an http(s) target, skipping"
                        ),
                    }
                }
                EscalationMethod::NotifyEmail => {
                    let uri = format!("mailto://{}", template.target);
                    match Self::template_tier(&uri, template.wait) {
                        Some(tier) => tiers.push(tier),
                        None => warn!(
                            team = name,
                            step = index,
                            target = %template.target,
                            "email step target is not a valid address, skipping"
                        ),
                    }
                }
            }
        }

        Ok(Notification::new(subject.into(), message.into(), tiers)?)
    }

    /// Parse a person's stored plan into resolved steps, dropping (and
    /// logging) steps with malformed target URIs.
    async fn person_steps(&self, username: &str) -> Result<Vec<NotificationStep>, AppError> {
        let plan = self
            .plans
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::PlanNotFound(username.into()))?;
        Ok(parse_plan_steps(&plan))
    }

    /// Build one escalation tier from a member's plan, or skip it.
    async fn person_tier(&self, username: &str, team: &str, index: usize) -> Option<EscalationStep> {
        match self.person_steps(username).await {
            Ok(steps) => match EscalationStep::new(steps) {
                Ok(tier) => Some(tier),
                Err(_) => {
                    warn!(team, step = index, username, "plan has no usable steps, skipping");
                    None
                }
            },
            Err(err) => {
                warn!(team, step = index, username, %err, "cannot build escalation step, skipping");
                None
            }
        }
    }

    /// A tier synthesized from the template itself (webhook, email): one
    /// attempt, kept active for the template's wait duration.
    fn template_tier(uri: &str, wait: Duration) -> Option<EscalationStep> {
        let target = ContactTarget::parse(uri).ok()?;
        let step = NotificationStep::new(target, Duration::ZERO, wait);
        EscalationStep::new(vec![step]).ok()
    }
}

fn parse_plan_steps(plan: &NotificationPlan) -> Vec<NotificationStep> {
    let mut steps = Vec::with_capacity(plan.steps.len());
    for stored in &plan.steps {
        match ContactTarget::parse(&stored.method) {
            Ok(target) => steps.push(NotificationStep::new(
                target,
                stored.notify_every,
                stored.notify_until,
            )),
            Err(_) => warn!(
                username = %plan.username,
                method = %stored.method,
                "skipping invalid notification step"
            ),
        }
    }
    steps
}

fn tier_scheme(tier: &EscalationStep) -> TargetScheme {
    tier.steps()[0].target().scheme()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use bantam_core::escalation::{EscalationPlan, EscalationStepTemplate};
    use bantam_core::plan::PlanStep;
    use bantam_core::team::Team;
    use bantam_ports::error::PortError;

    // --- Mock Adapters ---

    #[derive(Default)]
    struct MockPlans {
        plans: Mutex<HashMap<String, NotificationPlan>>,
    }

    impl MockPlans {
        fn with(plans: Vec<NotificationPlan>) -> Self {
            Self {
                plans: Mutex::new(
                    plans
                        .into_iter()
                        .map(|p| (p.username.clone(), p))
                        .collect(),
                ),
            }
        }
    }

    #[async_trait]
    impl NotificationPlanRepository for MockPlans {
        async fn save(&self, plan: &NotificationPlan) -> Result<(), PortError> {
            self.plans
                .lock()
                .unwrap()
                .insert(plan.username.clone(), plan.clone());
            Ok(())
        }
        async fn find_by_username(
            &self,
            username: &str,
        ) -> Result<Option<NotificationPlan>, PortError> {
            Ok(self.plans.lock().unwrap().get(username).cloned())
        }
        async fn delete(&self, _username: &str) -> Result<(), PortError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockTeams {
        teams: Mutex<HashMap<String, Team>>,
    }

    #[async_trait]
    impl TeamRepository for MockTeams {
        async fn save(&self, team: &Team) -> Result<(), PortError> {
            self.teams
                .lock()
                .unwrap()
                .insert(team.name.clone(), team.clone());
            Ok(())
        }
        async fn find_by_name(&self, name: &str) -> Result<Option<Team>, PortError> {
            Ok(self.teams.lock().unwrap().get(name).cloned())
        }
        async fn list_all(&self) -> Result<Vec<Team>, PortError> {
            Ok(self.teams.lock().unwrap().values().cloned().collect())
        }
        async fn delete(&self, _name: &str) -> Result<(), PortError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockEscalations {
        plans: Mutex<HashMap<String, EscalationPlan>>,
    }

    #[async_trait]
    impl EscalationPlanRepository for MockEscalations {
        async fn save(&self, plan: &EscalationPlan) -> Result<(), PortError> {
            self.plans
                .lock()
                .unwrap()
                .insert(plan.name.clone(), plan.clone());
            Ok(())
        }
        async fn find_by_name(&self, name: &str) -> Result<Option<EscalationPlan>, PortError> {
            Ok(self.plans.lock().unwrap().get(name).cloned())
        }
        async fn list_all(&self) -> Result<Vec<EscalationPlan>, PortError> {
            Ok(self.plans.lock().unwrap().values().cloned().collect())
        }
        async fn delete(&self, _name: &str) -> Result<(), PortError> {
            Ok(())
        }
    }

    // --- Fixtures ---

    fn sms_plan(username: &str) -> NotificationPlan {
        NotificationPlan {
            username: username.into(),
            steps: vec![PlanStep {
                method: format!("sms://{username}-phone"),
                notify_every: Duration::from_secs(60),
                notify_until: Duration::from_secs(300),
            }],
        }
    }

    fn kings_team() -> Team {
        Team {
            name: "kings".into(),
            description: String::new(),
            members: vec!["a".into(), "b".into(), "c".into()],
            rotation_policy: "kings".into(),
            escalation_plan: "kings".into(),
        }
    }

    fn template(method: EscalationMethod, target: &str) -> EscalationStepTemplate {
        EscalationStepTemplate {
            wait: Duration::from_secs(300),
            method,
            target: target.into(),
        }
    }

    fn resolver_for(
        plans: Vec<NotificationPlan>,
        team: Option<Team>,
        escalation: Option<EscalationPlan>,
    ) -> PlanResolver<MockPlans, MockTeams, MockEscalations> {
        let teams = MockTeams::default();
        if let Some(t) = team {
            teams.teams.lock().unwrap().insert(t.name.clone(), t);
        }
        let escalations = MockEscalations::default();
        if let Some(e) = escalation {
            escalations.plans.lock().unwrap().insert(e.name.clone(), e);
        }
        PlanResolver::new(MockPlans::with(plans), teams, escalations)
    }

    fn tier_addresses(n: &Notification) -> Vec<String> {
        n.escalation_steps()
            .iter()
            .map(|t| t.steps()[0].target().address().to_string())
            .collect()
    }

    // --- Person resolution ---

    #[tokio::test]
    async fn person_plan_becomes_single_tier() {
        let resolver = resolver_for(vec![sms_plan("lancelot")], None, None);
        let n = resolver
            .resolve_for_person("lancelot", "hi", "msg")
            .await
            .unwrap();

        assert_eq!(n.subject(), "hi");
        assert_eq!(n.message(), "msg");
        assert_eq!(n.escalation_steps().len(), 1);
        let steps = n.escalation_steps()[0].steps();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].target().address(), "lancelot-phone");
        assert_eq!(steps[0].retry(), Duration::from_secs(60));
        assert_eq!(steps[0].give_up(), Duration::from_secs(300));
    }

    #[tokio::test]
    async fn missing_person_plan_is_not_found() {
        let resolver = resolver_for(vec![], None, None);
        let err = resolver
            .resolve_for_person("galahad", "hi", "msg")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PlanNotFound(_)));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn malformed_plan_steps_are_dropped() {
        let mut plan = sms_plan("lancelot");
        plan.steps.push(PlanStep {
            method: "not a uri".into(),
            notify_every: Duration::ZERO,
            notify_until: Duration::ZERO,
        });
        let resolver = resolver_for(vec![plan], None, None);
        let n = resolver
            .resolve_for_person("lancelot", "hi", "msg")
            .await
            .unwrap();
        assert_eq!(n.escalation_steps()[0].steps().len(), 1);
    }

    // --- Team resolution ---

    #[tokio::test]
    async fn missing_team_is_not_found() {
        let resolver = resolver_for(vec![], None, None);
        let err = resolver
            .resolve_for_team("kings", "s", "m")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::TeamNotFound(_)));
    }

    #[tokio::test]
    async fn missing_escalation_plan_is_not_found() {
        let resolver = resolver_for(vec![], Some(kings_team()), None);
        let err = resolver
            .resolve_for_team("kings", "s", "m")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EscalationPlanNotFound(_)));
    }

    #[tokio::test]
    async fn next_in_rotation_walks_members_and_exhausts() {
        let plan = EscalationPlan {
            name: "kings".into(),
            description: String::new(),
            steps: vec![
                template(EscalationMethod::NotifyOnDuty, ""),
                template(EscalationMethod::NotifyNextInRotation, ""),
                template(EscalationMethod::NotifyNextInRotation, ""),
                template(EscalationMethod::NotifyNextInRotation, ""),
            ],
        };
        let resolver = resolver_for(
            vec![sms_plan("a"), sms_plan("b"), sms_plan("c")],
            Some(kings_team()),
            Some(plan),
        );

        let n = resolver.resolve_for_team("kings", "s", "m").await.unwrap();
        // the fourth template runs past the member list and is skipped
        assert_eq!(
            tier_addresses(&n),
            vec!["a-phone", "b-phone", "c-phone"]
        );
    }

    #[tokio::test]
    async fn all_in_rotation_covers_members_after_on_duty() {
        let plan = EscalationPlan {
            name: "kings".into(),
            description: String::new(),
            steps: vec![template(EscalationMethod::NotifyAllInRotation, "")],
        };
        let resolver = resolver_for(
            vec![sms_plan("a"), sms_plan("b"), sms_plan("c")],
            Some(kings_team()),
            Some(plan),
        );

        let n = resolver.resolve_for_team("kings", "s", "m").await.unwrap();
        // everyone from index 1 through the last, inclusive
        assert_eq!(tier_addresses(&n), vec!["b-phone", "c-phone"]);
    }

    #[tokio::test]
    async fn other_person_may_be_outside_the_team() {
        let plan = EscalationPlan {
            name: "kings".into(),
            description: String::new(),
            steps: vec![template(EscalationMethod::NotifyOtherPerson, "merlin")],
        };
        let resolver = resolver_for(vec![sms_plan("merlin")], Some(kings_team()), Some(plan));

        let n = resolver.resolve_for_team("kings", "s", "m").await.unwrap();
        assert_eq!(tier_addresses(&n), vec!["merlin-phone"]);
    }

    #[tokio::test]
    async fn webhook_and_email_tiers_use_template_wait() {
        let plan = EscalationPlan {
            name: "kings".into(),
            description: String::new(),
            steps: vec![
                template(EscalationMethod::NotifyWebhook, "https://hooks.example.com/p"),
                template(EscalationMethod::NotifyEmail, "ops@example.com"),
            ],
        };
        let resolver = resolver_for(vec![], Some(kings_team()), Some(plan));

        let n = resolver.resolve_for_team("kings", "s", "m").await.unwrap();
        assert_eq!(n.escalation_steps().len(), 2);

        let webhook = &n.escalation_steps()[0].steps()[0];
        assert_eq!(webhook.target().scheme(), TargetScheme::Webhook);
        assert_eq!(webhook.give_up(), Duration::from_secs(300));
        assert!(webhook.retry().is_zero());

        let email = &n.escalation_steps()[1].steps()[0];
        assert_eq!(email.target().scheme(), TargetScheme::Email);
        assert_eq!(email.target().address(), "ops@example.com");
    }

    #[tokio::test]
    async fn webhook_step_requires_http_target() {
        let plan = EscalationPlan {
            name: "kings".into(),
            description: String::new(),
            steps: vec![
                template(EscalationMethod::NotifyWebhook, "sms://5551234"),
                template(EscalationMethod::NotifyOnDuty, ""),
            ],
        };
        let resolver = resolver_for(vec![sms_plan("a")], Some(kings_team()), Some(plan));

        let n = resolver.resolve_for_team("kings", "s", "m").await.unwrap();
        assert_eq!(tier_addresses(&n), vec!["a-phone"]);
    }

    #[tokio::test]
    async fn member_without_plan_is_skipped_not_fatal() {
        let plan = EscalationPlan {
            name: "kings".into(),
            description: String::new(),
            steps: vec![
                template(EscalationMethod::NotifyOnDuty, ""),
                template(EscalationMethod::NotifyNextInRotation, ""),
            ],
        };
        // only "b" has a plan; the on-duty tier is skipped
        let resolver = resolver_for(vec![sms_plan("b")], Some(kings_team()), Some(plan));

        let n = resolver.resolve_for_team("kings", "s", "m").await.unwrap();
        assert_eq!(tier_addresses(&n), vec!["b-phone"]);
    }
}
