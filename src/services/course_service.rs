use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    gateway::ApiGateway,
    models::{
        domain::Course,
        dto::request::{CourseUpdate, NewCourse},
    },
    services::{
        endpoints,
        file_service::{FileService, FileUpload},
    },
};

/// Where a course's media comes from.
#[derive(Debug, Clone)]
pub enum MediaSource {
    File(FileUpload),
    Url(String),
}

impl MediaSource {
    fn mode(&self) -> &'static str {
        match self {
            MediaSource::File(_) => "file",
            MediaSource::Url(_) => "url",
        }
    }
}

pub struct CourseService {
    gateway: Arc<ApiGateway>,
    files: Arc<FileService>,
}

impl CourseService {
    pub fn new(gateway: Arc<ApiGateway>, files: Arc<FileService>) -> Self {
        Self { gateway, files }
    }

    pub async fn list_courses(&self) -> AppResult<Vec<Course>> {
        self.gateway.get_json(endpoints::COURSES).await
    }

    pub async fn get_course(&self, course_id: &str) -> AppResult<Course> {
        self.gateway
            .get_json(&endpoints::item(endpoints::COURSES, course_id))
            .await
    }

    pub async fn search_courses(&self, needle: &str) -> AppResult<Vec<Course>> {
        let courses = self.list_courses().await?;
        Ok(courses.into_iter().filter(|c| c.title_matches(needle)).collect())
    }

    /// Courses owned by the signed-in instructor.
    pub async fn my_courses(&self) -> AppResult<Vec<Course>> {
        let instructor_id = self.current_user_id()?;
        self.gateway
            .get_json(&endpoints::item(endpoints::COURSES_BY_INSTRUCTOR, &instructor_id))
            .await
    }

    pub async fn create_course(&self, mut course: NewCourse) -> AppResult<()> {
        if course.instructor_id.is_none() {
            course.instructor_id = Some(self.current_user_id()?);
        }
        course.validate()?;

        self.gateway
            .send_json(reqwest::Method::POST, endpoints::COURSES, &course)
            .await?;
        log::info!("Created course '{}'", course.title);
        Ok(())
    }

    /// Uploads (or registers) the media first, then creates the course
    /// pointing at the stored URL.
    pub async fn publish_course(
        &self,
        title: &str,
        description: &str,
        media: MediaSource,
    ) -> AppResult<()> {
        let draft = NewCourse::new(title, description);
        draft.validate()?;

        let mode = media.mode();
        let uploaded = match media {
            MediaSource::File(upload) => self.files.upload_file(upload).await?,
            MediaSource::Url(url) => self.files.upload_url(&url, &draft.title).await?,
        };
        let url = uploaded.url.unwrap_or_default();
        let media_type = uploaded.media_type.unwrap_or_else(|| mode.to_string());

        self.create_course(draft.with_media(&url, &media_type)).await
    }

    /// Edits title and description. `media: None` keeps the current media;
    /// a new file goes through the course upload endpoint and a URL is
    /// stored as given.
    pub async fn update_course(
        &self,
        course: &Course,
        title: &str,
        description: &str,
        media: Option<MediaSource>,
    ) -> AppResult<Course> {
        let media_url = match media {
            None => course.media_url.clone(),
            Some(MediaSource::Url(url)) => Some(url.trim().to_string()).filter(|u| !u.is_empty()),
            Some(MediaSource::File(upload)) => {
                self.files
                    .upload_to(endpoints::COURSES_UPLOAD, upload)
                    .await?
                    .url
            }
        };

        let update = CourseUpdate {
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            media_url,
        };
        update.validate()?;

        self.gateway
            .put_json(&endpoints::item(endpoints::COURSES, &course.course_id), &update)
            .await?;
        log::info!("Updated course {}", course.course_id);

        Ok(Course {
            title: update.title,
            description: update.description,
            media_url: update.media_url,
            ..course.clone()
        })
    }

    pub async fn delete_course(&self, course_id: &str) -> AppResult<()> {
        self.gateway
            .delete(&endpoints::item(endpoints::COURSES, course_id))
            .await?;
        log::info!("Deleted course {}", course_id);
        Ok(())
    }

    fn current_user_id(&self) -> AppResult<String> {
        self.gateway.session().user_id().ok_or_else(|| {
            AppError::AuthenticationFailure("no signed-in user".to_string())
        })
    }
}
