use hr_console::report::pipeline::{self, Row, apply_search, apply_sort, apply_status_filter, paginate};
use hr_console::report::record::Tabular;
use hr_console::report::value::{SortKind, parse_date};
use hr_console::report::view_state::{Direction, StatusFilter, ViewState};
use hr_console::screens::attendance::{AttendanceColumn, AttendanceRecord};
use hr_console::screens::leaves::LeaveRecord;
use hr_console::screens::loans::{LoanColumn, LoanRecord};

fn attendance(name: &str, code: &str, status_id: i64) -> AttendanceRecord {
    AttendanceRecord {
        employee_name: name.to_string(),
        employee_code: code.to_string(),
        date: "01-03-2024".to_string(),
        check_in: "09:00".to_string(),
        check_out: "18:00".to_string(),
        status_id,
        working_hours: 9.0,
    }
}

fn loan(id: &str, amount: f64, start_date: &str, status: &str) -> LoanRecord {
    LoanRecord {
        id: id.to_string(),
        employee_name: format!("Employee {}", id),
        loan_type: "Advance".to_string(),
        amount,
        rate: 0.0,
        tenure: 12.0,
        start_date: start_date.to_string(),
        status: status.to_string(),
    }
}

fn ids(records: &[&LoanRecord]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
}

/// 50 rows where exactly three mention "john" in some casing.
fn fifty_with_three_johns() -> Vec<AttendanceRecord> {
    (0..50)
        .map(|i| match i {
            7 => attendance("John Mathew", "E007", 1),
            23 => attendance("Priya JOHNSON", "E023", 2),
            41 => attendance("Ravi", "johnny-041", 1),
            _ => attendance(&format!("Employee {}", i), &format!("E{:03}", i), 1),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_is_case_insensitive_over_all_fields_and_keeps_order() {
        let records = fifty_with_three_johns();
        let all: Vec<&AttendanceRecord> = records.iter().collect();

        let found = apply_search(all, "john");

        let names: Vec<&str> = found.iter().map(|r| r.employee_name.as_str()).collect();
        assert_eq!(names, vec!["John Mathew", "Priya JOHNSON", "Ravi"]);
    }

    #[test]
    fn test_empty_search_is_a_no_op() {
        let records = fifty_with_three_johns();
        let all: Vec<&AttendanceRecord> = records.iter().collect();

        let found = apply_search(all.clone(), "");
        assert_eq!(found, all);
    }

    #[test]
    fn test_search_results_contain_query() {
        let records = fifty_with_three_johns();
        for query in ["e00", "EMPLOYEE 1", "present", "week", "18:00", "zzz"] {
            let found = apply_search(records.iter().collect(), query);
            assert!(found.len() <= records.len());
            let needle = query.to_lowercase();
            for record in found {
                assert!(
                    record
                        .search_values()
                        .iter()
                        .any(|v| v.to_lowercase().contains(&needle)),
                    "{:?} does not contain {}",
                    record,
                    query
                );
            }
        }
    }

    #[test]
    fn test_search_matches_derived_display_values() {
        let records = vec![attendance("A", "1", 1), attendance("B", "2", 3)];
        let found = apply_search(records.iter().collect(), "week off");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].employee_name, "B");
    }

    #[test]
    fn test_search_finds_fields_without_a_column() {
        let mut leave = LeaveRecord {
            id: "LV-9931".to_string(),
            employee_name: "Asha".to_string(),
            status: "Pending".to_string(),
            ..LeaveRecord::default()
        };
        let other = LeaveRecord {
            id: "LV-0001".to_string(),
            ..leave.clone()
        };
        let leaves = vec![leave.clone(), other];

        let found = apply_search(leaves.iter().collect(), "lv-9931");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "LV-9931");

        leave.id = "9931".to_string();
        assert_eq!(apply_search(vec![&leave], "9931").len(), 1);

        let loans = vec![loan("LN-77", 1.0, "", "Active"), loan("LN-12", 1.0, "", "Active")];
        let found = apply_search(loans.iter().collect(), "ln-77");
        assert_eq!(ids(&found), vec!["LN-77"]);

        let mut row = attendance("A", "E1", 2);
        row.check_in = String::new();
        row.check_out = String::new();
        row.date = String::new();
        row.working_hours = 0.5;
        assert_eq!(apply_search(vec![&row], "2").len(), 1, "raw status id is searchable");
    }

    #[test]
    fn test_status_filter_exact_match() {
        let records = vec![
            attendance("A", "1", 1),
            attendance("B", "2", 2),
            attendance("C", "3", 3),
            attendance("D", "4", 1),
        ];

        let all = apply_status_filter(records.iter().collect(), &StatusFilter::All);
        assert_eq!(all.len(), 4);

        let present = apply_status_filter(records.iter().collect(), &StatusFilter::parse("Present"));
        let names: Vec<&str> = present.iter().map(|r| r.employee_name.as_str()).collect();
        assert_eq!(names, vec!["A", "D"]);

        let week_off = apply_status_filter(records.iter().collect(), &StatusFilter::parse("Week Off"));
        assert_eq!(week_off.len(), 1);

        let lowercase = apply_status_filter(records.iter().collect(), &StatusFilter::parse("present"));
        assert!(lowercase.is_empty(), "filter is case-sensitive");

        assert_eq!(StatusFilter::parse("all"), StatusFilter::All);
    }

    #[test]
    fn test_numeric_sort_parses_values() {
        let records = vec![
            loan("a", 1000.0, "01-01-2024", "Active"),
            loan("b", 200.0, "01-01-2024", "Active"),
            loan("c", 30.0, "01-01-2024", "Active"),
        ];

        let asc = apply_sort(records.iter().collect(), Some(LoanColumn::Amount), Direction::Ascending);
        assert_eq!(ids(&asc), vec!["c", "b", "a"]);

        let desc = apply_sort(records.iter().collect(), Some(LoanColumn::Amount), Direction::Descending);
        assert_eq!(ids(&desc), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_date_sort_uses_day_month_year() {
        let records = vec![
            loan("jan", 1.0, "02-01-2024", "Active"),
            loan("dec", 1.0, "15-12-2023", "Active"),
            loan("mar", 1.0, "2024-03-10", "Active"),
            loan("bad", 1.0, "soon", "Active"),
        ];

        let sorted = apply_sort(records.iter().collect(), Some(LoanColumn::StartDate), Direction::Ascending);
        assert_eq!(ids(&sorted), vec!["bad", "dec", "jan", "mar"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let records = vec![
            loan("1", 5.0, "01-01-2024", "Closed"),
            loan("2", 5.0, "01-01-2024", "Active"),
            loan("3", 5.0, "01-01-2024", "Closed"),
            loan("4", 5.0, "01-01-2024", "Active"),
            loan("5", 5.0, "01-01-2024", "Closed"),
        ];

        let asc = apply_sort(records.iter().collect(), Some(LoanColumn::Status), Direction::Ascending);
        assert_eq!(ids(&asc), vec!["2", "4", "1", "3", "5"]);

        let desc = apply_sort(records.iter().collect(), Some(LoanColumn::Status), Direction::Descending);
        assert_eq!(ids(&desc), vec!["1", "3", "5", "2", "4"]);
    }

    #[test]
    fn test_no_sort_key_preserves_order() {
        let records = vec![loan("z", 3.0, "", "A"), loan("a", 1.0, "", "B")];
        let same = apply_sort(records.iter().collect(), None, Direction::Descending);
        assert_eq!(ids(&same), vec!["z", "a"]);
    }

    #[test]
    fn test_sort_toggling() {
        let mut view: ViewState<LoanColumn> = ViewState::new();

        view.toggle_sort(LoanColumn::Amount);
        assert_eq!(view.sort().unwrap().direction, Direction::Ascending);

        view.toggle_sort(LoanColumn::Amount);
        assert_eq!(view.sort().unwrap().direction, Direction::Descending);

        view.toggle_sort(LoanColumn::Rate);
        let spec = view.sort().unwrap();
        assert_eq!(spec.column, LoanColumn::Rate);
        assert_eq!(spec.direction, Direction::Ascending);

        assert!(view.toggle_sort_by_label("Start Date"));
        assert_eq!(view.sort().unwrap().column, LoanColumn::StartDate);
        assert!(!view.toggle_sort_by_label("start_date"));
    }

    #[test]
    fn test_sorting_twice_reverses_distinct_values() {
        let records: Vec<LoanRecord> = [40.0, 10.0, 30.0, 20.0]
            .iter()
            .enumerate()
            .map(|(i, &amount)| loan(&i.to_string(), amount, "", "Active"))
            .collect();

        let mut view: ViewState<LoanColumn> = ViewState::new();
        view.toggle_sort(LoanColumn::Amount);
        let first = pipeline::run(&records, &view, 10).records();
        view.toggle_sort(LoanColumn::Amount);
        let mut second = pipeline::run(&records, &view, 10).records();
        second.reverse();

        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn test_pagination_sizes() {
        for (len, expected_pages) in [(0usize, 0usize), (1, 1), (5, 1), (6, 2), (23, 5)] {
            let records: Vec<LoanRecord> = (0..len).map(|i| loan(&i.to_string(), 1.0, "", "Active")).collect();
            let refs: Vec<&LoanRecord> = records.iter().collect();

            let first = paginate(&refs, 1, 5);
            assert_eq!(first.total_pages, expected_pages, "len {}", len);
            assert_eq!(first.rows.len(), 5);

            for page in 1..=expected_pages {
                let current = paginate(&refs, page, 5);
                assert_eq!(current.rows.len(), 5, "len {} page {}", len, page);
            }
        }
    }

    #[test]
    fn test_last_page_is_padded_with_placeholders() {
        let records: Vec<LoanRecord> = (0..23).map(|i| loan(&i.to_string(), 1.0, "", "Active")).collect();
        let refs: Vec<&LoanRecord> = records.iter().collect();

        let last = paginate(&refs, 5, 5);
        assert_eq!(ids(&last.records()), vec!["20", "21", "22"]);
        assert_eq!(last.rows.iter().filter(|r| r.is_placeholder()).count(), 2);
        assert!(matches!(last.rows[0], Row::Record(_)));
        assert!(matches!(last.rows[4], Row::Placeholder));
    }

    #[test]
    fn test_empty_collection_yields_zero_pages_of_placeholders() {
        let records: Vec<LoanRecord> = Vec::new();
        let view: ViewState<LoanColumn> = ViewState::new();

        let page = pipeline::run(&records, &view, 5);
        assert_eq!(page.total_pages, 0);
        assert!(page.is_empty());
        assert_eq!(page.rows.len(), 5);
        assert!(page.rows.iter().all(Row::is_placeholder));
    }

    #[test]
    fn test_full_pipeline_filters_before_sorting_and_paging() {
        let records: Vec<AttendanceRecord> = (0..12)
            .map(|i| {
                let mut row = attendance(&format!("Staff {:02}", i), &format!("S{:02}", i), if i % 2 == 0 { 1 } else { 2 });
                row.working_hours = f64::from(i);
                row
            })
            .collect();

        let mut view: ViewState<AttendanceColumn> = ViewState::new();
        view.set_search("staff");
        view.set_status_filter(StatusFilter::parse("Present"));
        view.toggle_sort(AttendanceColumn::Hours);
        view.toggle_sort(AttendanceColumn::Hours);
        view.set_page(2);

        let page = pipeline::run(&records, &view, 4);
        assert_eq!(page.total_records, 6);
        assert_eq!(page.total_pages, 2);
        let names: Vec<&str> = page.records().iter().map(|r| r.employee_name.as_str()).collect();
        assert_eq!(names, vec!["Staff 02", "Staff 00"]);
        assert_eq!(page.rows.len(), 4);
    }

    #[test]
    fn test_view_state_resets_page_on_query_changes() {
        let mut view: ViewState<AttendanceColumn> = ViewState::new();
        assert_eq!(view.current_page(), 1);

        view.set_page(3);
        view.set_search("ann");
        assert_eq!(view.current_page(), 1);

        view.set_page(3);
        view.set_search("ann");
        assert_eq!(view.current_page(), 3, "unchanged query keeps the page");

        view.set_status_filter(StatusFilter::parse("Absent"));
        assert_eq!(view.current_page(), 1);

        view.set_page(2);
        view.toggle_sort(AttendanceColumn::Employee);
        assert_eq!(view.current_page(), 2, "sorting keeps the page");

        view.set_page(0);
        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn test_sort_kind_helpers() {
        assert_eq!(parse_date("05-06-2024"), parse_date("2024-06-05"));
        assert!(parse_date("31-02-2024").is_none());
        assert_eq!(SortKind::Numeric.compare("abc", "0"), std::cmp::Ordering::Equal);
        assert_eq!(SortKind::Text.compare("a", "B"), std::cmp::Ordering::Greater);
    }
}
