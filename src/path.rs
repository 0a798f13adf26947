/// Splits a dotted path into ordered key segments, honouring quoting.
///
/// Text outside double quotes splits on `.` with empty segments dropped;
/// text inside a quoted stretch is one opaque segment even when it
/// contains dots or other punctuation. The same rule applies to path
/// strings passed into accessor calls and to keys met lexically, so
/// `3.14` as a bare key addresses the same node as `3 { 14 : ... }`.
pub fn split_path(path: &str) -> Vec<String> {
    path.split('"')
        .enumerate()
        .flat_map(|(i, part)| {
            if i % 2 == 0 {
                part.split('.')
                    .filter(|segment| !segment.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            } else {
                vec![part.to_string()]
            }
        })
        .collect()
}
