use biometrics::{Collector, Counter, Moments};

pub(crate) static CHAT_SUBMITS: Counter = Counter::new("parley.chat.submits");
pub(crate) static CHAT_REJECTED: Counter = Counter::new("parley.chat.rejected");

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("parley.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("parley.client.request_errors");
pub(crate) static CLIENT_EMPTY_REPLIES: Counter = Counter::new("parley.client.empty_replies");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("parley.client.request_duration_seconds");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CHAT_SUBMITS);
    collector.register_counter(&CHAT_REJECTED);

    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_counter(&CLIENT_EMPTY_REPLIES);
    collector.register_moments(&CLIENT_REQUEST_DURATION);
}
