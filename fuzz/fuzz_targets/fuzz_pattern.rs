#![no_main]

use jdsearch::catalog::{ClassKind, NameRecord};
use jdsearch::query::{
    compile_exact_case_insensitive, compile_exact_case_sensitive, compile_fuzzy,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Every search string must compile to a usable predicate
    let record = NameRecord::class(ClassKind::Class, "java.lang", "Object");

    let fuzzy = compile_fuzzy(data);
    let _ = fuzzy.matches(&record);

    let exact = compile_exact_case_insensitive(data);
    if exact.matches(&record) {
        assert!(fuzzy.matches(&record));
    }
    let _ = compile_exact_case_sensitive(data).matches(&record);
});
