use chrono::NaiveDate;
use uuid::Uuid;

use super::course::AggregateDelta;
use super::error::{validate_non_negative, validate_title, ValidationError};
use super::term::DateWindow;

/// A single graded or ungraded unit of coursework. The weight is the
/// item's share of the course grade in percentage points; the final
/// grade is a 0-100+ percentage score and stays `None` until the work
/// is marked.
///
/// Items never touch course aggregates themselves. Each mutation
/// returns the [`AggregateDelta`] it causes, and the owning course is
/// the only code that applies it.
#[derive(Debug, Clone)]
pub struct SyllabusItem {
    id: Uuid,
    title: String,
    weight: f64,
    final_grade: Option<f64>,
    due_date: NaiveDate,
}

impl SyllabusItem {
    /// Validates everything up front; a failed construction has no
    /// side effects anywhere.
    pub(crate) fn new(
        title: &str,
        weight: f64,
        due_date: NaiveDate,
        final_grade: Option<f64>,
        window: DateWindow,
    ) -> Result<Self, ValidationError> {
        validate_title(title)?;
        validate_non_negative(weight)?;
        if let Some(grade) = final_grade {
            validate_non_negative(grade)?;
        }
        if !window.contains(due_date) {
            return Err(ValidationError::DateOutOfRange);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            weight,
            final_grade,
            due_date,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn final_grade(&self) -> Option<f64> {
        self.final_grade
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Share of the course grade already earned by this item:
    /// `weight * grade / 100` once marked, zero while ungraded.
    pub fn contribution(&self) -> f64 {
        match self.final_grade {
            Some(grade) => self.weight * (grade / 100.0),
            None => 0.0,
        }
    }

    /// Applies a new weight and returns the aggregate delta it causes.
    /// Setting the current weight again is a no-op.
    pub(crate) fn reweigh(&mut self, new_weight: f64) -> Result<AggregateDelta, ValidationError> {
        validate_non_negative(new_weight)?;
        if new_weight == self.weight {
            return Ok(AggregateDelta::NONE);
        }

        let old_contribution = self.contribution();
        let weight_diff = new_weight - self.weight;
        self.weight = new_weight;

        let mut delta = AggregateDelta {
            points: weight_diff,
            ..AggregateDelta::NONE
        };
        if self.final_grade.is_some() {
            delta.completed = weight_diff;
            delta.achieved = self.contribution() - old_contribution;
        }
        Ok(delta)
    }

    /// Records a (possibly revised) final grade. The first grade on an
    /// item moves its whole weight into the completed aggregate;
    /// regrading only shifts the achieved aggregate.
    pub(crate) fn grade(&mut self, grade: f64) -> Result<AggregateDelta, ValidationError> {
        validate_non_negative(grade)?;
        if self.final_grade == Some(grade) {
            return Ok(AggregateDelta::NONE);
        }

        let old_contribution = self.contribution();
        let first_grade = self.final_grade.is_none();
        self.final_grade = Some(grade);

        Ok(AggregateDelta {
            points: 0.0,
            completed: if first_grade { self.weight } else { 0.0 },
            achieved: self.contribution() - old_contribution,
        })
    }

    /// Reverts the item to ungraded. A no-op when no grade is set.
    pub(crate) fn clear_grade(&mut self) -> AggregateDelta {
        if self.final_grade.is_none() {
            return AggregateDelta::NONE;
        }
        let delta = AggregateDelta {
            points: 0.0,
            completed: -self.weight,
            achieved: -self.contribution(),
        };
        self.final_grade = None;
        delta
    }

    pub(crate) fn set_due_date(
        &mut self,
        date: NaiveDate,
        window: DateWindow,
    ) -> Result<(), ValidationError> {
        if !window.contains(date) {
            return Err(ValidationError::DateOutOfRange);
        }
        self.due_date = date;
        Ok(())
    }

    pub(crate) fn set_title(&mut self, title: &str) -> Result<(), ValidationError> {
        validate_title(title)?;
        self.title = title.to_string();
        Ok(())
    }

    /// Delta applied when this item joins a course.
    pub(crate) fn insertion_delta(&self) -> AggregateDelta {
        AggregateDelta {
            points: self.weight,
            completed: if self.final_grade.is_some() {
                self.weight
            } else {
                0.0
            },
            achieved: self.contribution(),
        }
    }

    /// Exact inverse of everything the item currently contributes;
    /// applied when the item is detached from its course.
    pub(crate) fn removal_delta(&self) -> AggregateDelta {
        AggregateDelta {
            points: -self.weight,
            completed: if self.final_grade.is_some() {
                -self.weight
            } else {
                0.0
            },
            achieved: -self.contribution(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn open_window() -> DateWindow {
        DateWindow::default()
    }

    #[test]
    fn contribution_is_zero_until_graded() {
        let mut item =
            SyllabusItem::new("quiz 1", 15.0, date(2021, 10, 4), None, open_window()).expect("item");
        assert_eq!(item.contribution(), 0.0);

        item.grade(90.0).expect("grade");
        assert!((item.contribution() - 13.5).abs() < 1e-9);
    }

    #[test]
    fn construction_validates_before_any_state_exists() {
        assert_eq!(
            SyllabusItem::new("", 10.0, date(2021, 10, 4), None, open_window()).unwrap_err(),
            ValidationError::EmptyTitle
        );
        assert_eq!(
            SyllabusItem::new("  ", 10.0, date(2021, 10, 4), None, open_window()).unwrap_err(),
            ValidationError::WhitespaceOnlyTitle
        );
        assert_eq!(
            SyllabusItem::new("essay", -1.0, date(2021, 10, 4), None, open_window()).unwrap_err(),
            ValidationError::NegativeValue
        );
        assert_eq!(
            SyllabusItem::new("essay", 10.0, date(2021, 10, 4), Some(-5.0), open_window())
                .unwrap_err(),
            ValidationError::NegativeValue
        );

        let window = DateWindow {
            start: Some(date(2021, 9, 1)),
            end: Some(date(2021, 12, 20)),
        };
        assert_eq!(
            SyllabusItem::new("essay", 10.0, date(2022, 1, 5), None, window).unwrap_err(),
            ValidationError::DateOutOfRange
        );
    }

    #[test]
    fn reweigh_with_same_weight_is_a_no_op() {
        let mut item = SyllabusItem::new("lab", 20.0, date(2021, 10, 4), Some(70.0), open_window())
            .expect("item");
        let delta = item.reweigh(20.0).expect("reweigh");
        assert_eq!(delta, AggregateDelta::NONE);
        assert_eq!(item.weight(), 20.0);
    }

    #[test]
    fn regrade_with_same_grade_is_a_no_op() {
        let mut item = SyllabusItem::new("lab", 20.0, date(2021, 10, 4), Some(70.0), open_window())
            .expect("item");
        let delta = item.grade(70.0).expect("grade");
        assert_eq!(delta, AggregateDelta::NONE);
    }

    #[test]
    fn insertion_and_removal_deltas_mirror_each_other() {
        let item = SyllabusItem::new("lab", 20.0, date(2021, 10, 4), Some(70.0), open_window())
            .expect("item");
        let ins = item.insertion_delta();
        let rem = item.removal_delta();
        assert_eq!(ins.points, -rem.points);
        assert_eq!(ins.completed, -rem.completed);
        assert_eq!(ins.achieved, -rem.achieved);
        assert_eq!(ins.points, 20.0);
        assert_eq!(ins.completed, 20.0);
        assert!((ins.achieved - 14.0).abs() < 1e-9);
    }
}
