use serde_json::json;

use crate::engine::{Course, ItemSnapshot};
use crate::ipc::error::{engine, err, ok, validation};
use crate::ipc::helpers::{optional_f64, require_date, require_f64, require_str, require_uuid};
use crate::ipc::types::{AppState, Request};

// Every mutation answers with the refreshed course summary so the
// caller can commit the new state to its store right away.
fn summary_response(id: &str, course: &Course) -> serde_json::Value {
    match serde_json::to_value(course.summary()) {
        Ok(v) => ok(id, v),
        Err(e) => err(id, "internal", e.to_string(), None),
    }
}

fn handle_syllabus_add(state: &mut AppState, req: &Request) -> serde_json::Value {
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
    let weight = match require_f64(req, "weight") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let due_date = match require_date(req, "dueDate") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let final_grade = match optional_f64(req, "finalGrade") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let Some(term) = state.registry.term_mut(term_id) else {
        return err(&req.id, "not_found", "term not found", None);
    };
    let window = term.window();
    let Some(course) = term.course_mut(course_id) else {
        return err(&req.id, "not_found", "course not found", None);
    };

    match course.add_item(&title, weight, due_date, final_grade, window) {
        Ok(item_id) => {
            let mut resp = summary_response(&req.id, course);
            resp["result"]["itemId"] = json!(item_id.to_string());
            resp
        }
        Err(e) => validation(&req.id, e),
    }
}

fn handle_syllabus_list(state: &mut AppState, req: &Request) -> serde_json::Value {
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

    let mut items: Vec<&crate::engine::SyllabusItem> = course.items().collect();
    items.sort_by(|a, b| {
        a.due_date()
            .cmp(&b.due_date())
            .then_with(|| a.title().cmp(b.title()))
            .then_with(|| a.id().cmp(&b.id()))
    });
    let rows: Vec<serde_json::Value> = items
        .into_iter()
        .map(|item| match serde_json::to_value(ItemSnapshot::from_item(item)) {
            Ok(v) => v,
            Err(_) => json!(null),
        })
        .collect();
    ok(&req.id, json!({ "items": rows }))
}

fn handle_syllabus_rename(state: &mut AppState, req: &Request) -> serde_json::Value {
    let term_id = match require_uuid(req, "termId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let course_id = match require_uuid(req, "courseId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let item_id = match require_uuid(req, "itemId") {
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

    match course.set_item_title(item_id, &title) {
        Ok(()) => summary_response(&req.id, course),
        Err(e) => engine(&req.id, e),
    }
}

fn handle_syllabus_set_weight(state: &mut AppState, req: &Request) -> serde_json::Value {
    let term_id = match require_uuid(req, "termId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let course_id = match require_uuid(req, "courseId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let item_id = match require_uuid(req, "itemId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let weight = match require_f64(req, "weight") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(course) = state.registry.course_mut(term_id, course_id) else {
        return err(&req.id, "not_found", "course not found", None);
    };

    match course.set_item_weight(item_id, weight) {
        Ok(()) => summary_response(&req.id, course),
        Err(e) => engine(&req.id, e),
    }
}

fn handle_syllabus_set_final_grade(state: &mut AppState, req: &Request) -> serde_json::Value {
    let term_id = match require_uuid(req, "termId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let course_id = match require_uuid(req, "courseId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let item_id = match require_uuid(req, "itemId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let grade = match require_f64(req, "grade") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(course) = state.registry.course_mut(term_id, course_id) else {
        return err(&req.id, "not_found", "course not found", None);
    };

    match course.set_item_final_grade(item_id, grade) {
        Ok(()) => summary_response(&req.id, course),
        Err(e) => engine(&req.id, e),
    }
}

fn handle_syllabus_remove_final_grade(state: &mut AppState, req: &Request) -> serde_json::Value {
    let term_id = match require_uuid(req, "termId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let course_id = match require_uuid(req, "courseId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let item_id = match require_uuid(req, "itemId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(course) = state.registry.course_mut(term_id, course_id) else {
        return err(&req.id, "not_found", "course not found", None);
    };

    match course.clear_item_final_grade(item_id) {
        Ok(()) => summary_response(&req.id, course),
        Err(e) => engine(&req.id, e),
    }
}

fn handle_syllabus_set_due_date(state: &mut AppState, req: &Request) -> serde_json::Value {
    let term_id = match require_uuid(req, "termId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let course_id = match require_uuid(req, "courseId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let item_id = match require_uuid(req, "itemId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let date = match require_date(req, "date") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let Some(term) = state.registry.term_mut(term_id) else {
        return err(&req.id, "not_found", "term not found", None);
    };
    let window = term.window();
    let Some(course) = term.course_mut(course_id) else {
        return err(&req.id, "not_found", "course not found", None);
    };

    match course.set_item_due_date(item_id, date, window) {
        Ok(()) => summary_response(&req.id, course),
        Err(e) => engine(&req.id, e),
    }
}

fn handle_syllabus_remove(state: &mut AppState, req: &Request) -> serde_json::Value {
    let term_id = match require_uuid(req, "termId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let course_id = match require_uuid(req, "courseId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let item_id = match require_uuid(req, "itemId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(course) = state.registry.course_mut(term_id, course_id) else {
        return err(&req.id, "not_found", "course not found", None);
    };

    match course.remove_item(item_id) {
        Some(_) => summary_response(&req.id, course),
        None => err(&req.id, "not_found", "syllabus item not found", None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "syllabus.add" => Some(handle_syllabus_add(state, req)),
        "syllabus.list" => Some(handle_syllabus_list(state, req)),
        "syllabus.rename" => Some(handle_syllabus_rename(state, req)),
        "syllabus.setWeight" => Some(handle_syllabus_set_weight(state, req)),
        "syllabus.setFinalGrade" => Some(handle_syllabus_set_final_grade(state, req)),
        "syllabus.removeFinalGrade" => Some(handle_syllabus_remove_final_grade(state, req)),
        "syllabus.setDueDate" => Some(handle_syllabus_set_due_date(state, req)),
        "syllabus.remove" => Some(handle_syllabus_remove(state, req)),
        _ => None,
    }
}
