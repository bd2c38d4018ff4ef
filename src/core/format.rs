use super::currency::RateMap;

/// Renders a rate map as one `CODE: rate` line per entry, in map order.
pub fn format_rate_map(rates: &RateMap) -> String {
    rates
        .iter()
        .map(|(code, rate)| format!("{code}: {rate}"))
        .collect::<Vec<_>>()
        .join("\n")
}
