use crate::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::models::ErrorBody;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

pub const ASSIGNMENT_LIST_VIEW: &str = "/api/v1/assignments";

pub fn assignment_detail_view(id: &str) -> String {
    format!("/api/v1/assignments/{id}")
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub instructor: &'static str,
    pub status: &'static str,
    pub video_count: u32,
    pub assignment_count: u32,
    pub student_count: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub due_date: &'static str,
    pub time_estimate: &'static str,
    pub status: &'static str,
}

// In-memory sample catalog. There is no database behind the portal.
pub const COURSES: &[Course] = &[
    Course {
        id: "cs101",
        title: "CS101: Introduction to Computer Science",
        description: "Learn the fundamentals of computer science, including algorithms, data structures, and programming basics.",
        instructor: "Dr. Alan Turing",
        status: "Active",
        video_count: 24,
        assignment_count: 8,
        student_count: 156,
    },
    Course {
        id: "math202",
        title: "MATH202: Linear Algebra",
        description: "Study vector spaces, linear transformations, matrices, and their applications in solving systems of linear equations.",
        instructor: "Dr. Katherine Johnson",
        status: "Active",
        video_count: 18,
        assignment_count: 6,
        student_count: 124,
    },
    Course {
        id: "eng305",
        title: "ENG305: Technical Writing",
        description: "Develop skills in writing clear, concise, and effective technical documents for various professional contexts.",
        instructor: "Prof. Jane Smith",
        status: "Active",
        video_count: 12,
        assignment_count: 10,
        student_count: 89,
    },
    Course {
        id: "bio220",
        title: "BIO220: Molecular Biology",
        description: "Explore the molecular basis of biological activity, including DNA structure, replication, and protein synthesis.",
        instructor: "Dr. Rosalind Franklin",
        status: "Active",
        video_count: 22,
        assignment_count: 7,
        student_count: 112,
    },
    Course {
        id: "hist101",
        title: "HIST101: World History",
        description: "Survey major events and developments in world history from ancient civilizations to the modern era.",
        instructor: "Prof. Howard Zinn",
        status: "Upcoming",
        video_count: 20,
        assignment_count: 5,
        student_count: 78,
    },
    Course {
        id: "phys301",
        title: "PHYS301: Quantum Mechanics",
        description: "Study the fundamental theory of nature at the small scale where classical physics does not apply.",
        instructor: "Dr. Richard Feynman",
        status: "Upcoming",
        video_count: 16,
        assignment_count: 8,
        student_count: 64,
    },
];

pub const ASSIGNMENTS: &[Assignment] = &[
    Assignment {
        id: "1",
        title: "Research Paper",
        description: "Submit a 5-page research paper on a topic of your choice related to the course material.",
        due_date: "March 15, 2025",
        time_estimate: "4-6 hours",
        status: "Pending",
    },
    Assignment {
        id: "2",
        title: "Data Analysis Project",
        description: "Analyze the provided dataset and submit your findings with visualizations.",
        due_date: "March 20, 2025",
        time_estimate: "3-5 hours",
        status: "Submitted",
    },
    Assignment {
        id: "3",
        title: "Group Presentation",
        description: "Prepare a 10-minute presentation with your assigned group on the given topic.",
        due_date: "March 10, 2025",
        time_estimate: "5-7 hours",
        status: "Late",
    },
    Assignment {
        id: "4",
        title: "Weekly Quiz",
        description: "Complete the online quiz covering material from weeks 5-6.",
        due_date: "March 5, 2025",
        time_estimate: "30-45 minutes",
        status: "Graded",
    },
];

#[utoipa::path(get, path = "/api/v1/courses", responses((status = OK, body = [Course])), description = "List courses")]
pub async fn list_courses() -> Json<Vec<Course>> {
    Json(COURSES.to_vec())
}

#[utoipa::path(get, path = "/api/v1/assignments", responses((status = OK, body = [Assignment])), description = "List assignments")]
pub async fn list_assignments(state: State<AppState>) -> Json<Value> {
    if let Some(view) = state.cache.get(ASSIGNMENT_LIST_VIEW) {
        return Json(view);
    }
    let view = serde_json::to_value(ASSIGNMENTS).unwrap();
    state.cache.put(ASSIGNMENT_LIST_VIEW, view.clone());
    Json(view)
}

#[utoipa::path(get, path = "/api/v1/assignments/{id}", params(("id" = String, Path, description = "Assignment id")), responses((status = OK, body = Assignment), (status = NOT_FOUND, body = ErrorBody)), description = "Get one assignment")]
pub async fn get_assignment(
    state: State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<ErrorBody>)> {
    let view_key = assignment_detail_view(&id);
    if let Some(view) = state.cache.get(&view_key) {
        return Ok(Json(view));
    }
    let assignment = ASSIGNMENTS.iter().find(|a| a.id == id).ok_or((
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "Assignment not found".to_string(),
        }),
    ))?;
    let view = serde_json::to_value(assignment).unwrap();
    state.cache.put(&view_key, view.clone());
    Ok(Json(view))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view_cache::ViewCache;
    use serde_json::json;
    use std::sync::Arc;

    fn test_state() -> AppState {
        AppState {
            cache: Arc::new(ViewCache::default()),
            config: Arc::new(crate::Config {
                port: 0,
                grading_url: "http://127.0.0.1:1".to_string(),
            }),
        }
    }

    #[tokio::test]
    async fn course_list_serves_the_sample_catalog() {
        let Json(courses) = list_courses().await;
        assert_eq!(courses.len(), 6);
        assert_eq!(courses[0].id, "cs101");
        assert_eq!(courses[5].instructor, "Dr. Richard Feynman");
    }

    #[tokio::test]
    async fn assignment_list_is_cached_after_the_first_read() {
        let state = test_state();
        let Json(view) = list_assignments(State(state.clone())).await;
        assert_eq!(view.as_array().unwrap().len(), 4);
        assert!(state.cache.get(ASSIGNMENT_LIST_VIEW).is_some());
    }

    #[tokio::test]
    async fn assignment_list_serves_the_cached_view() {
        let state = test_state();
        state.cache.put(ASSIGNMENT_LIST_VIEW, json!("sentinel"));
        let Json(view) = list_assignments(State(state)).await;
        assert_eq!(view, json!("sentinel"));
    }

    #[tokio::test]
    async fn unknown_assignment_is_a_404() {
        let state = test_state();
        let (status, Json(body)) = get_assignment(State(state), Path("99".to_string()))
            .await
            .err()
            .unwrap();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Assignment not found");
    }

    #[tokio::test]
    async fn assignment_detail_is_cached_per_id() {
        let state = test_state();
        let Json(view) = get_assignment(State(state.clone()), Path("2".to_string()))
            .await
            .unwrap();
        assert_eq!(view["title"], "Data Analysis Project");
        assert!(state.cache.get(&assignment_detail_view("2")).is_some());
        assert!(state.cache.get(&assignment_detail_view("1")).is_none());
    }
}
