mod callbacks;
mod escalations;
mod notifications;
mod people;
mod rotations;
mod teams;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/people", post(people::create).get(people::list))
        .route(
            "/people/{username}",
            get(people::show).put(people::update).delete(people::remove),
        )
        .route(
            "/people/{username}/plan",
            post(people::upsert_plan)
                .get(people::show_plan)
                .delete(people::remove_plan),
        )
        .route("/people/{username}/notify", post(notifications::notify_person))
        .route("/teams", post(teams::create).get(teams::list))
        .route(
            "/teams/{name}",
            get(teams::show).put(teams::update).delete(teams::remove),
        )
        .route("/teams/{name}/notify", post(notifications::notify_team))
        .route(
            "/escalations",
            post(escalations::create).get(escalations::list),
        )
        .route(
            "/escalations/{name}",
            get(escalations::show)
                .put(escalations::update)
                .delete(escalations::remove),
        )
        .route("/rotations", post(rotations::create).get(rotations::list))
        .route(
            "/rotations/{name}",
            get(rotations::show)
                .put(rotations::update)
                .delete(rotations::remove),
        )
        .route("/notifications/{uuid}", delete(notifications::stop))
        .route("/notifications/{uuid}/stop", get(notifications::stop_click))
        .route("/callbacks/sms/reply", post(callbacks::sms_reply))
        .route("/callbacks/{uuid}/digits", post(callbacks::receive_digits))
        .route(
            "/callbacks/{uuid}/twiml/notify",
            get(callbacks::twiml_notify).post(callbacks::twiml_notify),
        )
        .route(
            "/callbacks/{uuid}/twiml/acknowledged",
            get(callbacks::twiml_acknowledged).post(callbacks::twiml_acknowledged),
        )
        .route("/callbacks/{uuid}/callback", post(callbacks::status_callback))
        .with_state(state)
}
