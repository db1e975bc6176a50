use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

use super::course::Course;
use super::error::{validate_non_negative, validate_title, ValidationError};

/// Inclusive due-date bound a term imposes on the items of its
/// courses. A missing bound leaves that side open.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        if let Some(start) = self.start {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if date > end {
                return false;
            }
        }
        true
    }
}

/// A school term: a titled container of courses with optional date
/// bounds and GPA bookkeeping. Terms carry no aggregate logic of
/// their own; they own courses and bound item due dates.
#[derive(Debug, Clone)]
pub struct Term {
    id: Uuid,
    title: String,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    current_gpa: Option<f64>,
    goal_gpa: Option<f64>,
    courses: HashMap<Uuid, Course>,
}

impl Term {
    pub fn new(
        title: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        current_gpa: Option<f64>,
        goal_gpa: Option<f64>,
    ) -> Result<Self, ValidationError> {
        validate_title(title)?;
        if let (Some(start), Some(end)) = (start_date, end_date) {
            // A zero-length term is invalid: start must precede end.
            if start >= end {
                return Err(ValidationError::DateOutOfRange);
            }
        }
        if let Some(gpa) = current_gpa {
            validate_non_negative(gpa)?;
        }
        if let Some(gpa) = goal_gpa {
            validate_non_negative(gpa)?;
        }
        Ok(Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            start_date,
            end_date,
            current_gpa,
            goal_gpa,
            courses: HashMap::new(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn current_gpa(&self) -> Option<f64> {
        self.current_gpa
    }

    pub fn goal_gpa(&self) -> Option<f64> {
        self.goal_gpa
    }

    pub fn window(&self) -> DateWindow {
        DateWindow {
            start: self.start_date,
            end: self.end_date,
        }
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), ValidationError> {
        validate_title(title)?;
        self.title = title.to_string();
        Ok(())
    }

    pub fn set_start_date(&mut self, date: NaiveDate) -> Result<(), ValidationError> {
        if let Some(end) = self.end_date {
            if date >= end {
                return Err(ValidationError::DateOutOfRange);
            }
        }
        self.start_date = Some(date);
        Ok(())
    }

    pub fn set_end_date(&mut self, date: NaiveDate) -> Result<(), ValidationError> {
        if let Some(start) = self.start_date {
            if start >= date {
                return Err(ValidationError::DateOutOfRange);
            }
        }
        self.end_date = Some(date);
        Ok(())
    }

    pub fn set_current_gpa(&mut self, gpa: f64) -> Result<(), ValidationError> {
        validate_non_negative(gpa)?;
        self.current_gpa = Some(gpa);
        Ok(())
    }

    pub fn set_goal_gpa(&mut self, gpa: f64) -> Result<(), ValidationError> {
        validate_non_negative(gpa)?;
        self.goal_gpa = Some(gpa);
        Ok(())
    }

    /// Creates a course in this term. Propagates validation errors
    /// unchanged; nothing is registered on failure.
    pub fn add_course(
        &mut self,
        title: &str,
        goal_grade: Option<f64>,
        credit_hours: Option<f64>,
    ) -> Result<Uuid, ValidationError> {
        let course = Course::new(title, goal_grade, credit_hours)?;
        let id = course.id();
        self.courses.insert(id, course);
        Ok(id)
    }

    pub fn remove_course(&mut self, id: Uuid) -> Option<Course> {
        self.courses.remove(&id)
    }

    pub fn course(&self, id: Uuid) -> Option<&Course> {
        self.courses.get(&id)
    }

    pub fn course_mut(&mut self, id: Uuid) -> Option<&mut Course> {
        self.courses.get_mut(&id)
    }

    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.values()
    }

    pub fn course_count(&self) -> usize {
        self.courses.len()
    }
}
