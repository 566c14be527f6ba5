//! Integration tests for dashkit views and controls.
//!
//! Test categories:
//! - Combined filtering: search, status and date range together
//! - Filter + paginate pipelines
//! - Numeric control flows driven through messages, as a front end would

#![forbid(unsafe_code)]

use std::sync::Arc;
use std::time::Duration;

use dashkit::command::Cmd;
use dashkit::filter::{ALL_STATUSES, FilterView, SortDirective, status_counts};
use dashkit::message::{BlurMsg, KeyMsg, Message};
use dashkit::numeric::{NumericControl, Phase};
use dashkit::paginator::Paginator;
use dashkit::record::{parse_lower_bound, parse_upper_bound};
use parking_lot::Mutex;
use serde_json::{Value, json};

fn brokers() -> Vec<Value> {
    vec![
        json!({ "id": 1, "name": "Ada Park", "status": "active", "created_at": "2024-01-08T10:00:00Z" }),
        json!({ "id": 2, "name": "Ben Parker", "status": "active", "created_at": "2024-02-12T10:00:00Z" }),
        json!({ "id": 3, "name": "Cleo Park", "status": "inactive", "created_at": "2024-02-20T10:00:00Z" }),
        json!({ "id": 4, "name": "Dev Rao", "status": "active", "created_at": "2024-02-27T10:00:00Z" }),
        json!({ "id": 5, "name": "Eli Parkes", "status": "pending", "created_at": "2024-03-03T10:00:00Z" }),
    ]
}

fn ids(records: &[&Value]) -> Vec<i64> {
    records.iter().filter_map(|r| r["id"].as_i64()).collect()
}

// ============================================================================
// Filtering
// ============================================================================

mod filter_tests {
    use super::*;

    #[test]
    fn test_search_status_and_range_combine_with_and() {
        let mut view = FilterView::new(brokers(), ["name"]);

        view.set_selected_status("active");
        assert_eq!(ids(&view.filtered_data()), vec![1, 2, 4]);

        view.set_start_date(Some(parse_lower_bound("2024-02-01").unwrap()));
        view.set_end_date(Some(parse_upper_bound("2024-02-29").unwrap()));
        assert_eq!(ids(&view.filtered_data()), vec![2, 4]);

        view.set_search_value("park");
        assert_eq!(ids(&view.filtered_data()), vec![2]);

        // Every survivor satisfies all three predicates.
        for record in view.filtered_data() {
            assert_eq!(record["status"], "active");
            assert!(record["name"].as_str().unwrap().to_lowercase().contains("park"));
        }
    }

    #[test]
    fn test_sort_reversal_for_distinct_values() {
        let mut view = FilterView::new(brokers(), ["name"]);
        view.set_sort_by_str("name-asc").unwrap();
        let asc = ids(&view.filtered_data());
        view.set_sort_by_str("name-desc").unwrap();
        let mut desc = ids(&view.filtered_data());
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn test_clear_filters_in_one_step() {
        let mut view = FilterView::new(brokers(), ["name"]);
        view.set_search_value("zzz");
        view.set_selected_status("pending");
        view.set_sort_by(Some(SortDirective::desc("created_at")));
        view.set_start_date(Some(parse_lower_bound("2030-01-01").unwrap()));
        assert!(view.filtered_data().is_empty());

        view.clear_filters();
        assert_eq!(view.selected_status(), ALL_STATUSES);
        assert_eq!(ids(&view.filtered_data()), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_status_counts() {
        let counts = status_counts(&brokers());
        assert_eq!(counts[0], ("active".to_string(), 3));
        assert_eq!(counts.len(), 3);
    }
}

// ============================================================================
// Filter + paginate
// ============================================================================

mod pipeline_tests {
    use super::*;

    #[test]
    fn test_paginate_filtered_view() {
        let mut view = FilterView::new(brokers(), ["name"]);
        view.set_search_value("par");
        let visible = view.filtered_data();

        let mut paginator = Paginator::new().per_page(2).total_items(visible.len());
        paginator.handle_page_change(2);
        let page = paginator.paginate(&visible);
        assert_eq!(ids(page.items), vec![3, 5]);
        assert_eq!(page.total_items, 4);
        assert_eq!(page.total_pages, 2);
        assert_eq!(paginator.view(), "2/2");
    }

    #[test]
    fn test_narrowing_filter_clamps_page() {
        let mut view = FilterView::new(brokers(), ["name"]);
        let mut paginator = Paginator::new().per_page(1);

        paginator.paginate(&view.filtered_data());
        paginator.handle_page_change(5);
        assert_eq!(paginator.page(), 5);

        view.set_selected_status("active");
        let visible = view.filtered_data();
        let page = paginator.paginate(&visible);
        assert_eq!(page.current_page, 3);
        assert_eq!(ids(page.items), vec![4]);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let mut view = FilterView::new(brokers(), ["name"]);
        view.set_search_value("nobody");
        let visible = view.filtered_data();
        let mut paginator = Paginator::new();
        let page = paginator.paginate(&visible);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(paginator.view(), "0/0");
    }
}

// ============================================================================
// Numeric control
// ============================================================================

mod numeric_tests {
    use super::*;

    struct Harness {
        control: NumericControl,
        commits: Arc<Mutex<Vec<f64>>>,
    }

    impl Harness {
        fn new(current: f64, ceiling: f64) -> Self {
            let commits = Arc::new(Mutex::new(Vec::new()));
            let sink = Arc::clone(&commits);
            let control = NumericControl::new(current, ceiling, move |v| sink.lock().push(v))
                .debounce(Duration::from_millis(5));
            Self { control, commits }
        }

        fn commits(&self) -> Vec<f64> {
            self.commits.lock().clone()
        }

        /// Runs a command on a worker thread, the way an event loop would,
        /// and feeds its message back.
        fn run(&mut self, cmd: Option<Cmd>) {
            let Some(cmd) = cmd else { return };
            let msg = std::thread::spawn(move || cmd.execute())
                .join()
                .expect("command thread")
                .expect("command message");
            self.control.update(msg);
        }
    }

    #[test]
    fn test_increment_commits_four_once() {
        let mut h = Harness::new(3.0, 10.0);
        h.control.increment();
        assert_eq!(h.commits(), vec![4.0]);
    }

    #[test]
    fn test_typed_value_commits_after_window() {
        let mut h = Harness::new(3.0, 10.0);
        let cmd = h.control.set_input("7");
        assert!(h.commits().is_empty());
        h.run(cmd);
        assert_eq!(h.commits(), vec![7.0]);
    }

    #[test]
    fn test_enter_commits_immediately() {
        let mut h = Harness::new(3.0, 10.0);
        let cmd = h.control.set_input("6");
        h.control.update(Message::new(KeyMsg::new("enter")));
        assert_eq!(h.commits(), vec![6.0]);
        h.run(cmd);
        assert_eq!(h.commits(), vec![6.0]);
    }

    #[test]
    fn test_blur_commits_immediately() {
        let mut h = Harness::new(3.0, 10.0);
        let cmd = h.control.set_input("5");
        h.control.update(Message::new(BlurMsg));
        assert_eq!(h.commits(), vec![5.0]);
        h.run(cmd);
        assert_eq!(h.commits(), vec![5.0]);
    }

    #[test]
    fn test_commits_follow_action_order() {
        let mut h = Harness::new(0.0, 100.0);
        h.control.increment();
        let cmd = h.control.set_input("40");
        h.run(cmd);
        h.control.decrement();
        let _ = h.control.set_input("10");
        h.control.confirm();
        assert_eq!(h.commits(), vec![1.0, 40.0, 39.0, 10.0]);
    }

    #[test]
    fn test_instances_are_independent() {
        let mut a = Harness::new(1.0, 10.0);
        let mut b = Harness::new(1.0, 10.0);
        let cmd_a = a.control.set_input("2");
        let cmd_b = b.control.set_input("3");

        // Deliver b's timer to a: it must be ignored.
        let msg_b = cmd_b.and_then(Cmd::execute).unwrap();
        a.control.update(msg_b);
        assert!(a.commits().is_empty());
        assert_eq!(a.control.phase(), Phase::DirtyPending);

        a.run(cmd_a);
        assert_eq!(a.commits(), vec![2.0]);
        assert!(b.commits().is_empty());
    }

    #[test]
    fn test_rejected_write_rolled_back_by_caller() {
        let mut h = Harness::new(3.0, 10.0);
        h.control.increment();
        assert_eq!(h.control.value(), 4.0);

        // The store refused the write; the caller pushes the truth back.
        h.control.sync_external(3.0);
        assert_eq!(h.control.value(), 3.0);
        assert_eq!(h.control.input(), "3");
        assert_eq!(h.commits(), vec![4.0]);
    }

    #[test]
    fn test_disposed_control_never_commits() {
        let mut h = Harness::new(3.0, 10.0);
        let cmd = h.control.set_input("9");
        h.control.dispose();
        h.run(cmd);
        assert!(h.commits().is_empty());
    }
}
