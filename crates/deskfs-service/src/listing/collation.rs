//! Numeric-aware, case-insensitive name ordering.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

use deskfs_entity::item::Item;

/// Compare two names the way a file explorer does.
///
/// Letters compare case-insensitively and maximal runs of ASCII digits
/// compare by numeric value, so `"file2" < "File10"`. Names that are equal
/// under those rules fall back to plain string order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = take_digits(&mut left);
                let r_run = take_digits(&mut right);
                let ord = compare_digit_runs(&l_run, &r_run);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(l), Some(r)) => {
                let ord = l.to_lowercase().cmp(r.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

/// Sort a listing in place by [`natural_cmp`] on names.
pub fn sort_items(items: &mut [Item]) {
    items.sort_by(|a, b| natural_cmp(&a.name, &b.name));
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        run.push(c);
    }
    run
}

fn compare_digit_runs(l: &str, r: &str) -> Ordering {
    let l_trim = l.trim_start_matches('0');
    let r_trim = r.trim_start_matches('0');
    l_trim
        .len()
        .cmp(&r_trim.len())
        .then_with(|| l_trim.cmp(r_trim))
}
