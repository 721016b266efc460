#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfcombine::selection::{PageSelection, expand_lenient, finalize_pages, parse_and_normalize};

fuzz_target!(|data: &[u8]| {
    let Some((&count, rest)) = data.split_first() else {
        return;
    };
    let max_page = usize::from(count);
    let input = String::from_utf8_lossy(rest);

    // The lenient pass never fails and stays inside the document.
    let lenient = expand_lenient(&input, Some(max_page));
    assert!(lenient.iter().all(|&p| (1..=max_page).contains(&p)));

    let Ok(parsed) = parse_and_normalize(&input, max_page) else {
        return;
    };
    assert!(parsed.pages.iter().all(|&p| (1..=max_page).contains(&p)));

    // An empty normalized form only comes from a range that lost every
    // token, and such a range is never stored.
    assert_eq!(parsed.selects_nothing(), parsed.normalized.is_empty());
    if parsed.selects_nothing() {
        return;
    }

    // The normalized form is stable and selects the same pages.
    let again = parse_and_normalize(&parsed.normalized, max_page).expect("normalized range parses");
    assert_eq!(again.pages, parsed.pages);

    let selection = PageSelection::new(parsed.normalized.clone(), true, true);
    let finalized = finalize_pages(&selection, Some(max_page));
    assert!(finalized.windows(2).all(|w| w[0] < w[1]));

    // Stored and finalized, the range merges exactly the pages it parsed to.
    let mut expected = parsed.pages.clone();
    expected.sort_unstable();
    expected.dedup();
    assert_eq!(finalized, expected);
});
