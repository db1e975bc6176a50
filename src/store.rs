use std::collections::HashMap;

use uuid::Uuid;

use crate::engine::{Course, Term};

/// In-memory registry of every term the daemon is tracking (and,
/// through term ownership, every course and syllabus item).
///
/// Persistence stays with the caller: after each successful mutation
/// the handlers return the state to commit, keyed by entity id.
#[derive(Debug, Default)]
pub struct Registry {
    terms: HashMap<Uuid, Term>,
}

impl Registry {
    pub fn insert_term(&mut self, term: Term) -> Uuid {
        let id = term.id();
        self.terms.insert(id, term);
        id
    }

    pub fn remove_term(&mut self, id: Uuid) -> Option<Term> {
        self.terms.remove(&id)
    }

    pub fn term(&self, id: Uuid) -> Option<&Term> {
        self.terms.get(&id)
    }

    pub fn term_mut(&mut self, id: Uuid) -> Option<&mut Term> {
        self.terms.get_mut(&id)
    }

    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.terms.values()
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn course_count(&self) -> usize {
        self.terms.values().map(|t| t.course_count()).sum()
    }

    pub fn course(&self, term_id: Uuid, course_id: Uuid) -> Option<&Course> {
        self.terms.get(&term_id)?.course(course_id)
    }

    pub fn course_mut(&mut self, term_id: Uuid, course_id: Uuid) -> Option<&mut Course> {
        self.terms.get_mut(&term_id)?.course_mut(course_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_resolves_courses_through_their_term() {
        let mut registry = Registry::default();
        let mut term = Term::new("Fall 2021", None, None, None, None).expect("term");
        let course_id = term.add_course("CS 350", Some(85.0), None).expect("course");
        let term_id = registry.insert_term(term);

        assert_eq!(registry.term_count(), 1);
        assert_eq!(registry.course_count(), 1);
        assert!(registry.course(term_id, course_id).is_some());
        assert!(registry.course(course_id, term_id).is_none());

        registry.remove_term(term_id);
        assert_eq!(registry.course_count(), 0);
        assert!(registry.course(term_id, course_id).is_none());
    }
}
