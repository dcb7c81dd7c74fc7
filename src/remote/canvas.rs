use super::{
    Course, Enrollment, EnrollmentRole, RemoteAssignment, RemoteClient, Submission, User, UserId,
};
use crate::{Config, Error, Result};
use log::{debug, trace};
use reqwest::{
    blocking::{Client, Response},
    header::LINK,
};
use serde::de::DeserializeOwned;

const PER_PAGE: &str = "100";

/// Blocking client for the Canvas REST API, authenticated with a bearer token.
#[derive(Debug, Clone)]
pub struct CanvasClient {
    http: Client,
    base_url: String,
    token: String,
}

impl CanvasClient {
    pub fn new<U, T>(base_url: U, token: T) -> Result<Self>
    where
        U: AsRef<str>,
        T: Into<String>,
    {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: String::from(base_url.as_ref().trim_end_matches('/')),
            token: token.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.api_url(), config.api_token()?)
    }

    #[inline]
    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/{path}", self.base_url)
    }

    fn send(&self, url: &str, query: &[(&str, &str)]) -> Result<Response> {
        trace!("GET {url} {query:?}");
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(Error::unexpected_status(url, status))
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let body = self.send(&self.url(path), query)?.text()?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Follows `rel="next"` links until every page has been read.
    fn get_all<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<T>> {
        let mut query = query.to_vec();
        query.push(("per_page", PER_PAGE));
        let mut response = self.send(&self.url(path), &query)?;
        let mut items = Vec::new();
        loop {
            let next = response
                .headers()
                .get(LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(next_link);
            let page: Vec<T> = serde_json::from_str(&response.text()?)?;
            items.extend(page);
            match next {
                // The next link already carries the query.
                Some(url) => response = self.send(&url, &[])?,
                None => break,
            }
        }
        debug!("Read {} item(s) from {path}", items.len());
        Ok(items)
    }
}

/// Pulls the `rel="next"` target out of a `Link` header.
fn next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|part| {
        let mut segments = part.split(';');
        let target = segments.next()?.trim();
        let is_next = segments.any(|param| {
            let param = param.trim();
            param == r#"rel="next""# || param == "rel=next"
        });
        is_next.then(|| {
            String::from(
                target
                    .trim_start_matches('<')
                    .trim_end_matches('>'),
            )
        })
    })
}

impl RemoteClient for CanvasClient {
    fn list_active_courses(&self, include_term: bool) -> Result<Vec<Course>> {
        let mut query = vec![("enrollment_state", "active")];
        if include_term {
            query.push(("include[]", "term"));
        }
        self.get_all("courses", &query)
    }

    fn list_assignments(&self, course: &Course) -> Result<Vec<RemoteAssignment>> {
        self.get_all(
            &format!("courses/{}/assignments", course.id),
            &[("order_by", "due_at")],
        )
    }

    fn get_submission(
        &self,
        assignment: &RemoteAssignment,
        user_id: UserId,
    ) -> Result<Submission> {
        self.get(
            &format!(
                "courses/{}/assignments/{}/submissions/{user_id}",
                assignment.course_id, assignment.id
            ),
            &[],
        )
    }

    fn get_enrollments(&self, course: &Course, role: EnrollmentRole) -> Result<Vec<Enrollment>> {
        self.get_all(
            &format!("courses/{}/enrollments", course.id),
            &[("type[]", role.as_ref())],
        )
    }

    fn get_current_user_id(&self) -> Result<UserId> {
        let user: User = self.get("users/self", &[])?;
        Ok(user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn finds_next_link() {
        let header = r#"<https://canvas.example.edu/api/v1/courses?page=1&per_page=100>; rel="current",<https://canvas.example.edu/api/v1/courses?page=2&per_page=100>; rel="next",<https://canvas.example.edu/api/v1/courses?page=1&per_page=100>; rel="first""#;
        assert_eq!(
            next_link(header).as_deref(),
            Some("https://canvas.example.edu/api/v1/courses?page=2&per_page=100")
        );
    }

    #[test]
    fn last_page_has_no_next_link() {
        let header = r#"<https://canvas.example.edu/api/v1/courses?page=3>; rel="current", <https://canvas.example.edu/api/v1/courses?page=1>; rel="first", <https://canvas.example.edu/api/v1/courses?page=3>; rel="last""#;
        assert_eq!(next_link(header), None);
    }

    #[test]
    fn trims_trailing_slash() {
        let client = CanvasClient::new("https://canvas.example.edu/", "token").unwrap();
        assert_eq!(
            client.url("users/self"),
            "https://canvas.example.edu/api/v1/users/self"
        );
    }
}
