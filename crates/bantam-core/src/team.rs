use serde::{Deserialize, Serialize};

/// A team of people with a rotation policy and an escalation plan, both
/// referenced by name. `members[0]` is always the on-duty person; shift
/// changes reorder the list rather than tracking a separate cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Ordered member usernames; SHOULD all be stored people.
    pub members: Vec<String>,
    pub rotation_policy: String,
    pub escalation_plan: String,
}

impl Team {
    /// Advance the rotation by one shift: the on-duty member moves to the
    /// back of the list and the next member takes over.
    pub fn rotate(&mut self) {
        if self.members.len() > 1 {
            self.members.rotate_left(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kings() -> Team {
        Team {
            name: "kings".into(),
            description: String::new(),
            members: vec!["one".into(), "two".into(), "three".into(), "four".into()],
            rotation_policy: "kings".into(),
            escalation_plan: "kings".into(),
        }
    }

    #[test]
    fn rotate_moves_head_to_tail() {
        let mut team = kings();
        team.rotate();
        assert_eq!(team.members, vec!["two", "three", "four", "one"]);
    }

    #[test]
    fn two_rotations() {
        let mut team = kings();
        team.rotate();
        team.rotate();
        assert_eq!(team.members, vec!["three", "four", "one", "two"]);
    }

    #[test]
    fn rotate_single_member_is_noop() {
        let mut team = kings();
        team.members = vec!["arthur".into()];
        team.rotate();
        assert_eq!(team.members, vec!["arthur"]);
    }

    #[test]
    fn rotate_empty_is_noop() {
        let mut team = kings();
        team.members.clear();
        team.rotate();
        assert!(team.members.is_empty());
    }
}
