#![no_main]

use arbitrary::Arbitrary;
use jdsearch::query::QueryState;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Edit {
    Update(String),
    EraseSegment,
    Erase,
}

fuzz_target!(|edits: Vec<Edit>| {
    let mut state = QueryState::new();
    for edit in edits {
        match edit {
            Edit::Update(raw) => state.update(&raw),
            Edit::EraseSegment => state.erase_segment(),
            Edit::Erase => state.erase(),
        }

        // Re-reading the whole query must reproduce it
        let entire = state.entire_query_string();
        let mut reparsed = QueryState::new();
        reparsed.update(&entire);
        assert_eq!(reparsed.name_query(), state.name_query());
    }
});
