use uuid::Uuid;

/// New time-ordered identifier.
pub fn new_id() -> Uuid {
    Uuid::now_v7()
}

/// Creation time in milliseconds since the Unix epoch, if the id carries one.
pub fn timestamp_millis(id: &Uuid) -> Option<u64> {
    let (secs, nanos) = id.get_timestamp()?.to_unix();
    Some(secs * 1_000 + u64::from(nanos) / 1_000_000)
}

#[cfg(test)]
pub(crate) fn id_at(millis: u64) -> Uuid {
    let nanos = ((millis % 1_000) * 1_000_000) as u32;
    Uuid::new_v7(uuid::Timestamp::from_unix(
        uuid::NoContext,
        millis / 1_000,
        nanos,
    ))
}
