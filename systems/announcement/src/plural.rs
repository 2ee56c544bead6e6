//! English counting helpers.

/// Materials and masses that read the same in singular and plural.
const UNCOUNTABLE: &[&str] = &[
    "cloth", "deer", "dirt", "filth", "gold", "granite", "grass", "jade", "limestone", "marble",
    "plasteel", "rubble", "sand", "sandstone", "silver", "slate", "steel", "uranium", "wood",
];

/// Plural form of `label` when there are `count` of it.
///
/// Only the last word changes, so `oak tree` becomes `oak trees`.
#[must_use]
pub fn pluralize(label: &str, count: usize) -> String {
    if count == 1 {
        return label.to_owned();
    }
    let (head, last) = match label.rsplit_once(' ') {
        Some((head, last)) => (Some(head), last),
        None => (None, label),
    };
    let plural_last = plural_word(last);
    match head {
        Some(head) => format!("{head} {plural_last}"),
        None => plural_last,
    }
}

fn plural_word(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if word.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_owned();
    }
    if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return format!("{word}es");
    }
    if let Some(stem) = word.strip_suffix('y') {
        if !stem.ends_with(&['a', 'e', 'i', 'o', 'u'][..]) {
            return format!("{stem}ies");
        }
    }
    format!("{word}s")
}

/// `"3 oak trees"`, `"1 oak tree"`, `"4 granite"`.
#[must_use]
pub fn count_phrase(count: usize, label: &str) -> String {
    format!("{count} {}", pluralize(label, count))
}

/// Joins parts as `"a"`, `"a and b"` or `"a, b and c"`.
#[must_use]
pub fn join_list(parts: &[String]) -> String {
    match parts {
        [] => String::new(),
        [only] => only.clone(),
        [rest @ .., last] => format!("{} and {last}", rest.join(", ")),
    }
}

/// Groups repeated labels into counted phrases, most frequent first.
///
/// At most `limit` groups are listed; the remainder collapses into
/// `"N others"`. Labels seen equally often keep their first-seen order.
#[must_use]
pub fn group_labels<'a, I>(labels: I, limit: usize) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut groups: Vec<(&str, usize)> = Vec::new();
    for label in labels {
        match groups.iter_mut().find(|(seen, _)| *seen == label) {
            Some((_, count)) => *count += 1,
            None => groups.push((label, 1)),
        }
    }
    groups.sort_by(|a, b| b.1.cmp(&a.1));

    let limit = limit.max(1);
    let mut parts: Vec<String> = groups
        .iter()
        .take(limit)
        .map(|(label, count)| count_phrase(*count, label))
        .collect();
    let others: usize = groups.iter().skip(limit).map(|(_, count)| count).sum();
    if others > 0 {
        parts.push(if others == 1 {
            "1 other".to_owned()
        } else {
            format!("{others} others")
        });
    }
    join_list(&parts)
}

/// Upper-cases the first letter.
#[must_use]
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
