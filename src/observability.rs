use biometrics::{Collector, Counter};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("pichat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("pichat.client.request_errors");

pub(crate) static STREAM_FRAMES: Counter = Counter::new("pichat.stream.frames");
pub(crate) static STREAM_REPAIRED_FRAMES: Counter = Counter::new("pichat.stream.repaired_frames");
pub(crate) static STREAM_DROPPED_FRAMES: Counter = Counter::new("pichat.stream.dropped_frames");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);

    collector.register_counter(&STREAM_FRAMES);
    collector.register_counter(&STREAM_REPAIRED_FRAMES);
    collector.register_counter(&STREAM_DROPPED_FRAMES);
}
