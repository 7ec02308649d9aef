//! Calendar state: the single owner of displayed schedule entries
//!
//! Entries are keyed by id and kept in insertion order. Merges replace entries
//! that share an id in place and append the rest, so applying the same result
//! twice leaves the calendar unchanged.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

use crate::types::{EmployeeFilter, MergeSummary, ScheduleItem};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarState {
    items: Vec<ScheduleItem>,
}

impl CalendarState {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Non-destructive incremental merge
    pub fn merge(&mut self, items: Vec<ScheduleItem>) -> MergeSummary {
        let mut summary = MergeSummary::default();
        for item in items {
            match self.position(&item.id) {
                Some(index) => {
                    self.items[index] = item;
                    summary.replaced += 1;
                }
                None => {
                    self.items.push(item);
                    summary.inserted += 1;
                }
            }
        }
        summary
    }

    /// Manual "add shift"; returns false when it replaced an existing entry
    pub fn add_item(&mut self, item: ScheduleItem) -> bool {
        self.merge(vec![item]).inserted == 1
    }

    pub fn remove_item(&mut self, id: &str) -> Option<ScheduleItem> {
        self.position(id).map(|index| self.items.remove(index))
    }

    /// Drop every entry, returning how many were removed
    pub fn clear(&mut self) -> usize {
        let removed = self.items.len();
        self.items.clear();
        removed
    }

    pub fn add_employee(&mut self, item_id: &str, name: &str) -> bool {
        let name = name.trim();
        match self.position(item_id) {
            Some(index) if !name.is_empty() && !self.items[index].has_employee(name) => {
                self.items[index].employees.push(name.to_string());
                true
            }
            _ => false,
        }
    }

    pub fn remove_employee(&mut self, item_id: &str, name: &str) -> bool {
        let Some(index) = self.position(item_id) else {
            return false;
        };
        let employees = &mut self.items[index].employees;
        let before = employees.len();
        employees.retain(|employee| employee != name);
        employees.len() != before
    }

    /// Move an entry to another day (drag-and-drop rescheduling)
    pub fn reschedule(&mut self, item_id: &str, date: NaiveDate) -> bool {
        match self.position(item_id) {
            Some(index) => {
                self.items[index].date = date;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&ScheduleItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[ScheduleItem] {
        &self.items
    }

    /// Entries for one day, ordered by start time
    pub fn items_for_day(&self, date: NaiveDate, filter: &EmployeeFilter) -> Vec<&ScheduleItem> {
        let mut day: Vec<&ScheduleItem> = self
            .items
            .iter()
            .filter(|item| item.date == date && filter.matches(item))
            .collect();
        day.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        day
    }

    /// Entries falling in a calendar month, ordered by date then start time
    pub fn items_in_month(&self, year: i32, month: u32) -> Vec<&ScheduleItem> {
        let mut entries: Vec<&ScheduleItem> = self
            .items
            .iter()
            .filter(|item| item.date.year() == year && item.date.month() == month)
            .collect();
        entries.sort_by(|a, b| (a.date, &a.start_time).cmp(&(b.date, &b.start_time)));
        entries
    }

    /// Distinct employee names across all entries
    pub fn employees(&self) -> BTreeSet<&str> {
        self.items
            .iter()
            .flat_map(|item| item.employees.iter().map(String::as_str))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
