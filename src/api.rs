use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::lesson::{Lesson, LessonUpdate};

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("Failed to read response body: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server returned an error: {status}")]
    ServerError { status: u16 },
}

#[derive(Deserialize)]
struct LessonEnvelope {
    lesson: Lesson,
}

/// Blocking client for the platform's lesson endpoints.
///
/// Persistence here is at-most-once and non-transactional: a save overwrites
/// the stored document wholesale, there is no retry and no conflict
/// detection. The block core never touches the network; failures stop at the
/// caller of this client.
pub struct ApiClient {
    base_url: String,
    api_key: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Fetches one lesson record, `contentJson` included as an opaque string.
    pub fn get_lesson(&self, course_id: &str, lesson_id: &str) -> Result<Lesson> {
        let request = self.authorize(ureq::get(&self.lesson_url(course_id, Some(lesson_id))));
        let response = request
            .call()
            .map_err(map_transport_error)
            .context("Failed to fetch lesson")?;

        let envelope: LessonEnvelope = response
            .into_json()
            .context("Failed to read lesson response body")?;
        Ok(envelope.lesson)
    }

    /// Creates a lesson under a course and returns the stored record.
    pub fn create_lesson(&self, course_id: &str, update: &LessonUpdate) -> Result<Lesson> {
        let request = self.authorize(ureq::post(&self.lesson_url(course_id, None)));
        let response = request
            .send_json(update)
            .map_err(map_transport_error)
            .context("Failed to create lesson")?;

        let envelope: LessonEnvelope = response
            .into_json()
            .context("Failed to read lesson response body")?;
        Ok(envelope.lesson)
    }

    /// Patches a lesson with `{title, content, contentJson, order}` and
    /// returns the stored record.
    pub fn update_lesson(
        &self,
        course_id: &str,
        lesson_id: &str,
        update: &LessonUpdate,
    ) -> Result<Lesson> {
        let url = self.lesson_url(course_id, Some(lesson_id));
        let request = self.authorize(ureq::request("PATCH", &url));
        let response = request
            .send_json(update)
            .map_err(map_transport_error)
            .context("Failed to update lesson")?;

        let envelope: LessonEnvelope = response
            .into_json()
            .context("Failed to read lesson response body")?;
        Ok(envelope.lesson)
    }

    pub fn delete_lesson(&self, course_id: &str, lesson_id: &str) -> Result<()> {
        let request = self.authorize(ureq::delete(&self.lesson_url(course_id, Some(lesson_id))));
        request
            .call()
            .map_err(map_transport_error)
            .context("Failed to delete lesson")?;
        Ok(())
    }

    fn lesson_url(&self, course_id: &str, lesson_id: Option<&str>) -> String {
        match lesson_id {
            Some(lesson_id) => format!(
                "{}/teacher/courses/{}/lessons/{}",
                self.base_url, course_id, lesson_id
            ),
            None => format!("{}/teacher/courses/{}/lessons", self.base_url, course_id),
        }
    }

    fn authorize(&self, request: ureq::Request) -> ureq::Request {
        let request = request.set("Content-Type", "application/json");
        match &self.api_key {
            Some(key) => request.set("Authorization", &format!("Bearer {}", key)),
            None => request,
        }
    }
}

fn map_transport_error(err: ureq::Error) -> RequestError {
    match err {
        ureq::Error::Status(code, _) => {
            log::warn!("lesson API returned status {code}");
            RequestError::ServerError { status: code }
        }
        other => RequestError::Http(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_urls_are_rooted_under_the_course() {
        let client = ApiClient::new("https://platform.example/api/");
        assert_eq!(
            client.lesson_url("c1", Some("l1")),
            "https://platform.example/api/teacher/courses/c1/lessons/l1"
        );
        assert_eq!(
            client.lesson_url("c1", None),
            "https://platform.example/api/teacher/courses/c1/lessons"
        );
    }

    #[test]
    fn envelope_unwraps_the_lesson_field() {
        let raw = r#"{"lesson":{"id":"l1","title":"T","content":"","order":0}}"#;
        let envelope: LessonEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.lesson.id, "l1");
    }
}
