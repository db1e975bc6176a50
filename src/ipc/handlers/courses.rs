use serde_json::json;

use crate::engine::Course;
use crate::ipc::error::{err, ok, validation};
use crate::ipc::helpers::{optional_f64, require_f64, require_str, require_uuid};
use crate::ipc::types::{AppState, Request};

fn course_row(course: &Course) -> serde_json::Value {
    json!({
        "courseId": course.id().to_string(),
        "title": course.title(),
        "goalGrade": course.goal_grade(),
        "creditHours": course.credit_hours(),
        "itemCount": course.item_count(),
        "totalCoursePoints": course.total_course_points(),
        "targetGrade": course.target_grade(),
    })
}

fn summary_response(id: &str, course: &Course) -> serde_json::Value {
    match serde_json::to_value(course.summary()) {
        Ok(v) => ok(id, v),
        Err(e) => err(id, "internal", e.to_string(), None),
    }
}

fn handle_courses_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let term_id = match require_uuid(req, "termId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let title = match require_str(req, "title") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let goal_grade = match optional_f64(req, "goalGrade") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let credit_hours = match optional_f64(req, "creditHours") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(term) = state.registry.term_mut(term_id) else {
        return err(&req.id, "not_found", "term not found", None);
    };

    match term.add_course(&title, goal_grade, credit_hours) {
        Ok(course_id) => ok(&req.id, json!({ "courseId": course_id.to_string() })),
        Err(e) => validation(&req.id, e),
    }
}

fn handle_courses_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let term_id = match require_uuid(req, "termId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(term) = state.registry.term(term_id) else {
        return err(&req.id, "not_found", "term not found", None);
    };

    let mut courses: Vec<serde_json::Value> = term.courses().map(course_row).collect();
    courses.sort_by(|a, b| a["title"].as_str().cmp(&b["title"].as_str()));
    ok(&req.id, json!({ "courses": courses }))
}

fn handle_courses_rename(state: &mut AppState, req: &Request) -> serde_json::Value {
    let term_id = match require_uuid(req, "termId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let course_id = match require_uuid(req, "courseId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let title = match require_str(req, "title") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(course) = state.registry.course_mut(term_id, course_id) else {
        return err(&req.id, "not_found", "course not found", None);
    };

    match course.set_title(&title) {
        Ok(()) => ok(&req.id, course_row(course)),
        Err(e) => validation(&req.id, e),
    }
}

fn handle_courses_set_goal_grade(state: &mut AppState, req: &Request) -> serde_json::Value {
    let term_id = match require_uuid(req, "termId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let course_id = match require_uuid(req, "courseId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let goal = match require_f64(req, "goalGrade") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(course) = state.registry.course_mut(term_id, course_id) else {
        return err(&req.id, "not_found", "course not found", None);
    };

    match course.set_goal_grade(goal) {
        Ok(()) => summary_response(&req.id, course),
        Err(e) => validation(&req.id, e),
    }
}

fn handle_courses_set_credit_hours(state: &mut AppState, req: &Request) -> serde_json::Value {
    let term_id = match require_uuid(req, "termId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let course_id = match require_uuid(req, "courseId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let hours = match require_f64(req, "creditHours") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(course) = state.registry.course_mut(term_id, course_id) else {
        return err(&req.id, "not_found", "course not found", None);
    };

    match course.set_credit_hours(hours) {
        Ok(()) => ok(&req.id, course_row(course)),
        Err(e) => validation(&req.id, e),
    }
}

fn handle_courses_summary(state: &mut AppState, req: &Request) -> serde_json::Value {
    let term_id = match require_uuid(req, "termId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let course_id = match require_uuid(req, "courseId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(course) = state.registry.course(term_id, course_id) else {
        return err(&req.id, "not_found", "course not found", None);
    };

    summary_response(&req.id, course)
}

fn handle_courses_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let term_id = match require_uuid(req, "termId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let course_id = match require_uuid(req, "courseId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(term) = state.registry.term_mut(term_id) else {
        return err(&req.id, "not_found", "term not found", None);
    };

    match term.remove_course(course_id) {
        Some(_) => ok(&req.id, json!({ "courseId": course_id.to_string() })),
        None => err(&req.id, "not_found", "course not found", None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "courses.create" => Some(handle_courses_create(state, req)),
        "courses.list" => Some(handle_courses_list(state, req)),
        "courses.rename" => Some(handle_courses_rename(state, req)),
        "courses.setGoalGrade" => Some(handle_courses_set_goal_grade(state, req)),
        "courses.setCreditHours" => Some(handle_courses_set_credit_hours(state, req)),
        "courses.summary" => Some(handle_courses_summary(state, req)),
        "courses.delete" => Some(handle_courses_delete(state, req)),
        _ => None,
    }
}
