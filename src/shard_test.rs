use super::*;

#[test]
fn default_config_is_128_shards_1024_hint() {
    let cfg = ShardTableConfig::default();
    assert_eq!(cfg.shards, 128);
    assert_eq!(cfg.capacity_hint_per_shard, 1024);
}

#[test]
fn non_power_of_two_shard_count_rounds_up() {
    let table = ShardTable::new(ShardTableConfig::new(5, 1));
    assert_eq!(table.shard_count(), 8);
}

#[test]
fn zero_shards_floors_to_one() {
    let table = ShardTable::new(ShardTableConfig::new(0, 1));
    assert_eq!(table.shard_count(), 1);
}

#[test]
fn power_of_two_shard_count_is_unchanged() {
    let table = ShardTable::new(ShardTableConfig::new(64, 1));
    assert_eq!(table.shard_count(), 64);
}

#[test]
fn first_sight_key_creates_a_full_entry() {
    let table = ShardTable::new(ShardTableConfig::new(4, 4));
    let tokens = table.with_entry_or_insert(b"a", 7, 0, |e| {
        e.tokens_fp.load(std::sync::atomic::Ordering::Relaxed)
    });
    assert_eq!(tokens, 7 * crate::entry::FP_SCALE);
}

#[test]
fn repeated_lookups_reuse_the_same_entry() {
    let table = ShardTable::new(ShardTableConfig::new(4, 4));
    table.with_entry_or_insert(b"a", 1, 0, |e| {
        e.tokens_fp
            .store(0, std::sync::atomic::Ordering::Relaxed);
    });
    let tokens = table.with_entry_or_insert(b"a", 1, 0, |e| {
        e.tokens_fp.load(std::sync::atomic::Ordering::Relaxed)
    });
    assert_eq!(tokens, 0);
}

#[test]
fn size_tracks_distinct_keys() {
    let table = ShardTable::new(ShardTableConfig::new(4, 4));
    assert_eq!(table.size(), 0);
    table.with_entry_or_insert(b"a", 1, 0, |_| {});
    table.with_entry_or_insert(b"b", 1, 0, |_| {});
    table.with_entry_or_insert(b"a", 1, 0, |_| {});
    assert_eq!(table.size(), 2);
}

#[test]
fn clear_drops_all_entries_and_resets_size() {
    let table = ShardTable::new(ShardTableConfig::new(4, 4));
    table.with_entry_or_insert(b"a", 1, 0, |_| {});
    table.with_entry_or_insert(b"b", 1, 0, |_| {});
    assert_eq!(table.size(), 2);
    table.clear();
    assert_eq!(table.size(), 0);

    // after clear, the next lookup for a previously-seen key creates a
    // fresh full bucket rather than reusing old state.
    let tokens = table.with_entry_or_insert(b"a", 3, 0, |e| {
        e.tokens_fp.load(std::sync::atomic::Ordering::Relaxed)
    });
    assert_eq!(tokens, 3 * crate::entry::FP_SCALE);
}

#[test]
fn distinct_keys_do_not_share_state() {
    let table = ShardTable::new(ShardTableConfig::new(4, 4));
    table.with_entry_or_insert(b"a", 5, 0, |e| {
        e.tokens_fp
            .store(0, std::sync::atomic::Ordering::Relaxed);
    });
    let b_tokens = table.with_entry_or_insert(b"b", 5, 0, |e| {
        e.tokens_fp.load(std::sync::atomic::Ordering::Relaxed)
    });
    assert_eq!(b_tokens, 5 * crate::entry::FP_SCALE);
}
