//! Session state model.
//!
//! A [`Session`] holds the images uploaded during one user session, the active
//! image and the chat transcript. Every operation is a pure, synchronous state
//! transition; there is no I/O here.

use serde::Serialize;
use std::sync::Arc;

use super::annotation::Annotation;
use super::image::UploadedImage;
use super::message::{ChatEntry, Speaker};
use crate::error::{GlimpseError, Result};
use crate::inference::InferenceReply;

/// State for one user session.
///
/// Images and chat entries are append-only. `active_index` is `None` until the
/// first upload and follows the newest image on every upload after that.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    id: String,
    created_at: String,
    images: Vec<UploadedImage>,
    active_index: Option<usize>,
    chat_history: Vec<ChatEntry>,
}

impl Session {
    /// Creates an empty session.
    ///
    /// # Examples
    ///
    /// ```
    /// use glimpse_core::session::Session;
    ///
    /// let session = Session::new("local");
    /// assert!(session.images().is_empty());
    /// assert_eq!(session.active_index(), None);
    /// ```
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
            images: Vec::new(),
            active_index: None,
            chat_history: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    pub fn images(&self) -> &[UploadedImage] {
        &self.images
    }

    pub fn image(&self, index: usize) -> Result<&UploadedImage> {
        self.images.get(index).ok_or(GlimpseError::IndexOutOfRange {
            index,
            len: self.images.len(),
        })
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn active_image(&self) -> Option<&UploadedImage> {
        self.active_index.and_then(|index| self.images.get(index))
    }

    pub fn chat_history(&self) -> &[ChatEntry] {
        &self.chat_history
    }

    pub fn contains_image(&self, name: &str) -> bool {
        self.images.iter().any(|image| image.name() == name)
    }

    /// Appends an image without an annotation and makes it active.
    ///
    /// # Errors
    ///
    /// Returns [`GlimpseError::DuplicateName`] if an image with the same name
    /// was already uploaded. The session is left unchanged.
    pub fn add_image(
        &mut self,
        name: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Result<usize> {
        let name = name.into();
        if self.contains_image(&name) {
            return Err(GlimpseError::duplicate_name(name));
        }

        self.images.push(UploadedImage::new(name, bytes.into()));
        let index = self.images.len() - 1;
        self.active_index = Some(index);
        Ok(index)
    }

    /// Attaches an annotation to the image at `index`.
    ///
    /// # Errors
    ///
    /// - [`GlimpseError::IndexOutOfRange`] if `index` is not a valid image index
    /// - [`GlimpseError::AnnotationAlreadySet`] if the image is already annotated
    pub fn set_annotation(&mut self, index: usize, annotation: Annotation) -> Result<()> {
        let len = self.images.len();
        let image = self
            .images
            .get_mut(index)
            .ok_or(GlimpseError::IndexOutOfRange { index, len })?;

        if image.is_annotated() {
            return Err(GlimpseError::AnnotationAlreadySet { index });
        }

        image.set_annotation(annotation);
        Ok(())
    }

    /// Makes the image at `index` the active one.
    pub fn select_active(&mut self, index: usize) -> Result<()> {
        if index >= self.images.len() {
            return Err(GlimpseError::IndexOutOfRange {
                index,
                len: self.images.len(),
            });
        }
        self.active_index = Some(index);
        Ok(())
    }

    pub fn append_chat(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.chat_history.push(ChatEntry::new(speaker, text));
    }

    /// Appends an assistant entry that keeps the reply's outcome tag.
    pub fn append_reply(&mut self, reply: InferenceReply) {
        self.chat_history.push(ChatEntry::from_reply(reply));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::ReplyKind;

    fn bytes(seed: u8) -> Vec<u8> {
        vec![seed; 4]
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new("s1");
        assert_eq!(session.id(), "s1");
        assert!(session.images().is_empty());
        assert!(session.chat_history().is_empty());
        assert_eq!(session.active_index(), None);
        assert!(session.active_image().is_none());
    }

    #[test]
    fn test_add_image_tracks_latest_as_active() {
        let mut session = Session::new("s1");
        let names = ["a.png", "b.jpg", "c.webp", "d.jpeg", "e.png"];

        for (expected_index, name) in names.iter().enumerate() {
            let index = session.add_image(*name, bytes(expected_index as u8)).unwrap();
            assert_eq!(index, expected_index);
            assert_eq!(session.active_index(), Some(expected_index));
            assert_eq!(session.images().len(), expected_index + 1);
        }

        let stored: Vec<&str> = session.images().iter().map(|i| i.name()).collect();
        assert_eq!(stored, names);
        assert!(session.images().iter().all(|i| i.annotation().is_none()));
    }

    #[test]
    fn test_add_image_rejects_duplicate_name() {
        let mut session = Session::new("s1");
        session.add_image("cat.jpg", bytes(1)).unwrap();
        session.add_image("dog.jpg", bytes(2)).unwrap();

        let err = session.add_image("cat.jpg", bytes(3)).unwrap_err();
        assert_eq!(err, GlimpseError::duplicate_name("cat.jpg"));
        assert_eq!(session.images().len(), 2);
        assert_eq!(session.active_index(), Some(1));
        assert_eq!(session.images()[0].bytes(), &bytes(1)[..]);
    }

    #[test]
    fn test_set_annotation_once_per_image() {
        let mut session = Session::new("s1");
        for i in 0..3u8 {
            session.add_image(format!("img{i}.png"), bytes(i)).unwrap();
        }

        for index in 0..3 {
            let first = Annotation::Caption(InferenceReply::answer(format!("first {index}")));
            session.set_annotation(index, first.clone()).unwrap();

            let second = Annotation::Caption(InferenceReply::answer("second"));
            let err = session.set_annotation(index, second).unwrap_err();
            assert_eq!(err, GlimpseError::AnnotationAlreadySet { index });
            assert_eq!(session.image(index).unwrap().annotation(), Some(&first));
        }
    }

    #[test]
    fn test_set_annotation_out_of_range() {
        let mut session = Session::new("s1");
        let err = session
            .set_annotation(0, Annotation::Caption(InferenceReply::answer("x")))
            .unwrap_err();
        assert_eq!(err, GlimpseError::IndexOutOfRange { index: 0, len: 0 });
    }

    #[test]
    fn test_select_active() {
        let mut session = Session::new("s1");
        session.add_image("a.png", bytes(1)).unwrap();
        session.add_image("b.png", bytes(2)).unwrap();

        session.select_active(0).unwrap();
        assert_eq!(session.active_image().map(|i| i.name()), Some("a.png"));

        let err = session.select_active(2).unwrap_err();
        assert_eq!(err, GlimpseError::IndexOutOfRange { index: 2, len: 2 });
        assert_eq!(session.active_index(), Some(0));

        session.add_image("c.png", bytes(3)).unwrap();
        assert_eq!(session.active_index(), Some(2));
    }

    #[test]
    fn test_chat_is_append_only_and_tagged() {
        let mut session = Session::new("s1");
        session.append_chat(Speaker::User, "hi");
        session.append_reply(InferenceReply::degraded("hi"));

        let history = session.chat_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].pair(), (Speaker::User, "hi"));
        assert_eq!(history[0].kind, None);
        assert_eq!(history[1].speaker, Speaker::Assistant);
        assert_eq!(history[1].kind, Some(ReplyKind::QuotaExceeded));
    }
}
