use crate::domain::Tab;
use thiserror::Error;

/// Where a search term leads: a tab and the id of the element to highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTarget {
    pub tab: Tab,
    pub element_id: &'static str,
}

const fn target(tab: Tab, element_id: &'static str) -> SearchTarget {
    SearchTarget { tab, element_id }
}

/// Search terms in lookup order. Partial matches resolve to the first entry
/// containing the query, so the order is significant.
const PARAMETERS: &[(&str, SearchTarget)] = &[
    ("Device ID", target(Tab::LiveStatus, "Device ID")),
    ("Device State", target(Tab::LiveStatus, "Device State")),
    ("FW Version", target(Tab::LiveStatus, "FW Version")),
    ("Temperature", target(Tab::LiveStatus, "Temperature")),
    ("Humidity", target(Tab::LiveStatus, "Humidity")),
    ("Voltage Battery", target(Tab::LiveStatus, "Voltage Battery")),
    ("Voltage Solar Panel", target(Tab::LiveStatus, "Voltage Solar Panel")),
    ("Running Current", target(Tab::LiveStatus, "Running Current")),
    ("Avg Current", target(Tab::LiveStatus, "Average Current")),
    ("Motor Speed", target(Tab::LiveStatus, "Motor Speed")),
    ("Panel Location", target(Tab::LiveStatus, "Panel Location")),
    ("Battery %", target(Tab::LiveStatus, "Battery")),
    ("Connectivity Status", target(Tab::LiveStatus, "Connectivity Status")),
    ("Total Runtime", target(Tab::LiveStatus, "Total Runtime")),
    ("DBG Accel Output", target(Tab::LiveStatus, "DBG Accel Output")),
    ("DBG Gyro Output", target(Tab::LiveStatus, "DBG Gyro Output")),
    ("DBG Motor Status 0", target(Tab::LiveStatus, "DBG Motor Status 0")),
    ("DBG Motor Status 1", target(Tab::LiveStatus, "DBG Motor Status 1")),
    ("General Status", target(Tab::LiveStatus, "General Status")),
    ("Time Stamp", target(Tab::LiveStatus, "Time Stamp")),
    ("error code", target(Tab::Reports, "Error Code")),
    ("total runtime reports", target(Tab::Reports, "Total Runtime")),
    ("dbg accel output", target(Tab::Reports, "DBG Accel Output")),
    ("dbg gyro output", target(Tab::Reports, "DBG Gyro Output")),
    ("dbg motor status 0", target(Tab::Reports, "DBG Motor Status 0")),
    ("dbg motor status 1", target(Tab::Reports, "DBG Motor Status 1")),
    ("general status", target(Tab::Reports, "General Status")),
    ("time stamp reports", target(Tab::Reports, "Time Stamp")),
];

/// Resolves a query to a UI location, ignoring case and surrounding whitespace.
///
/// An exact match on a search term wins, otherwise the first term containing
/// the query is used.
pub fn search(query: &str) -> Result<SearchTarget, SearchError> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(SearchError::EmptyQuery);
    }

    let exact = PARAMETERS.iter().find(|(term, _)| term.to_lowercase() == needle);
    exact
        .or_else(|| PARAMETERS.iter().find(|(term, _)| term.to_lowercase().contains(&needle)))
        .map(|(_, target)| *target)
        .ok_or_else(|| SearchError::NotFound(query.trim().to_string()))
}

#[derive(Error, Debug, PartialEq)]
pub enum SearchError {
    #[error("nothing to search for")]
    EmptyQuery,
    #[error("Parameter not found! ('{0}')")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Device ID", Tab::LiveStatus, "Device ID")]
    #[case("device id", Tab::LiveStatus, "Device ID")]
    #[case("  HUMIDITY  ", Tab::LiveStatus, "Humidity")]
    #[case("avg current", Tab::LiveStatus, "Average Current")]
    #[case("battery %", Tab::LiveStatus, "Battery")]
    #[case("Error Code", Tab::Reports, "Error Code")]
    #[case("total runtime reports", Tab::Reports, "Total Runtime")]
    #[case("time stamp reports", Tab::Reports, "Time Stamp")]
    fn exact_terms_resolve_case_insensitively(#[case] query: &str, #[case] tab: Tab, #[case] element_id: &str) {
        let result = search(query).unwrap();

        assert_eq!(result.tab, tab);
        assert_eq!(result.element_id, element_id);
    }

    #[rstest]
    #[case::live_status_term_comes_first("dbg accel output", Tab::LiveStatus)]
    #[case::exact_beats_an_earlier_partial("total runtime", Tab::LiveStatus)]
    fn exact_matches_follow_term_order(#[case] query: &str, #[case] tab: Tab) {
        assert_eq!(search(query).unwrap().tab, tab);
    }

    #[rstest]
    #[case("solar", Tab::LiveStatus, "Voltage Solar Panel")]
    #[case("voltage", Tab::LiveStatus, "Voltage Battery")]
    #[case("runtime rep", Tab::Reports, "Total Runtime")]
    #[case("error", Tab::Reports, "Error Code")]
    #[case("status 1", Tab::LiveStatus, "DBG Motor Status 1")]
    fn partial_matches_take_the_first_term_containing_the_query(#[case] query: &str, #[case] tab: Tab, #[case] element_id: &'static str) {
        assert_eq!(search(query), Ok(SearchTarget { tab, element_id }));
    }

    #[test]
    fn unknown_parameter_is_not_found() {
        assert_eq!(search(" pressure "), Err(SearchError::NotFound("pressure".to_string())));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_query_is_rejected(#[case] query: &str) {
        assert_eq!(search(query), Err(SearchError::EmptyQuery));
    }
}
