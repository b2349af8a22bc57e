use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("chatrelay.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("chatrelay.client.request_errors");
pub(crate) static CLIENT_MALFORMED_REPLIES: Counter =
    Counter::new("chatrelay.client.malformed_replies");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("chatrelay.client.request_duration_seconds");

pub(crate) static SESSION_TURNS: Counter = Counter::new("chatrelay.session.turns");
pub(crate) static SESSION_IGNORED_INPUTS: Counter = Counter::new("chatrelay.session.ignored_inputs");
pub(crate) static SESSION_REPLIES: Counter = Counter::new("chatrelay.session.replies");
pub(crate) static SESSION_FALLBACKS: Counter = Counter::new("chatrelay.session.fallbacks");
pub(crate) static SESSION_TURN_DURATION: Moments =
    Moments::new("chatrelay.session.turn_duration_seconds");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_counter(&CLIENT_MALFORMED_REPLIES);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&SESSION_TURNS);
    collector.register_counter(&SESSION_IGNORED_INPUTS);
    collector.register_counter(&SESSION_REPLIES);
    collector.register_counter(&SESSION_FALLBACKS);
    collector.register_moments(&SESSION_TURN_DURATION);
}
