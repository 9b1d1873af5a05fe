use std::path::Path;

use tracing::info;

use crate::error::ValidationError;
use crate::gateway::Gateway;
use crate::image::ImageUpload;
use crate::input::TextInput;
use crate::panel::Panel;

pub const IMAGE_FALLBACK: &str = "Failed to analyze image. Please try again.";

pub struct ImagePanel {
    pub path_input: TextInput,
    pub input: TextInput,
    pub request: Panel<String>,
    upload: Option<ImageUpload>,
    validation: Option<ValidationError>,
}

impl ImagePanel {
    pub fn new() -> Self {
        Self {
            path_input: TextInput::new(),
            input: TextInput::new(),
            request: Panel::new("image", IMAGE_FALLBACK),
            upload: None,
            validation: None,
        }
    }

    pub fn upload(&self) -> Option<&ImageUpload> {
        self.upload.as_ref()
    }

    pub fn validation(&self) -> Option<&ValidationError> {
        self.validation.as_ref()
    }

    /// Validate and encode the file named in the path input. A rejected file leaves any
    /// previously accepted image in place.
    pub fn load_from_path_input(&mut self) -> bool {
        let raw = self.path_input.value().trim().to_string();
        if raw.is_empty() {
            return false;
        }
        self.load(Path::new(&raw))
    }

    pub fn load(&mut self, path: &Path) -> bool {
        match ImageUpload::load(path) {
            Ok(upload) => self.accept(upload),
            Err(err) => {
                info!(path = %path.display(), error = %err, "image rejected");
                self.validation = Some(err);
                false
            }
        }
    }

    pub fn accept(&mut self, upload: ImageUpload) -> bool {
        info!(file = %upload.file_name, bytes = upload.size, "image accepted");
        self.upload = Some(upload);
        self.validation = None;
        true
    }

    /// Submission needs a prompt and an accepted image, and no call in flight
    pub fn can_submit(&self) -> bool {
        !self.input.is_blank() && self.upload.is_some() && !self.request.is_awaiting()
    }

    pub fn submit(&mut self, gateway: &Gateway) -> bool {
        if self.request.is_awaiting() {
            return false;
        }
        let Some(upload) = self.upload.clone() else {
            self.validation = Some(ValidationError::NoImage);
            return false;
        };
        if self.input.is_blank() {
            self.validation = Some(ValidationError::EmptyPrompt);
            return false;
        }

        self.validation = None;
        let prompt = self.input.value().to_string();
        let gateway = gateway.clone();
        self.request
            .submit(async move { gateway.analyze_image(&prompt, &upload).await })
    }
}

impl Default for ImagePanel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewaySettings;
    use crate::image::MAX_IMAGE_BYTES;
    use crate::panel::PanelStatus;
    use std::fs;

    fn offline_gateway() -> Gateway {
        Gateway::new(&GatewaySettings::new("test-key").with_base_url("http://127.0.0.1:9")).unwrap()
    }

    #[tokio::test]
    async fn test_submit_requires_image() {
        let mut panel = ImagePanel::new();
        panel.input.set("What is in this diagram?");

        assert!(!panel.can_submit());
        assert!(!panel.submit(&offline_gateway()));
        assert_eq!(panel.validation(), Some(&ValidationError::NoImage));
        assert_eq!(panel.request.status(), &PanelStatus::Idle);
    }

    #[tokio::test]
    async fn test_submit_requires_prompt() {
        let mut panel = ImagePanel::new();
        panel.accept(ImageUpload::from_bytes("a.png", "image/png", b"png").unwrap());

        assert!(!panel.submit(&offline_gateway()));
        assert_eq!(panel.validation(), Some(&ValidationError::EmptyPrompt));
    }

    #[test]
    fn test_oversized_file_keeps_previous_upload() {
        let dir = tempfile::tempdir().unwrap();
        let small = dir.path().join("small.png");
        fs::write(&small, b"small").unwrap();
        let large = dir.path().join("large.png");
        fs::File::create(&large).unwrap().set_len(MAX_IMAGE_BYTES + 1).unwrap();

        let mut panel = ImagePanel::new();
        assert!(panel.load(&small));
        assert!(!panel.load(&large));

        assert_eq!(panel.upload().map(|u| u.file_name.as_str()), Some("small.png"));
        assert!(matches!(panel.validation(), Some(ValidationError::ImageTooLarge { .. })));
    }

    #[test]
    fn test_load_from_path_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.webp");
        fs::write(&path, b"webp").unwrap();

        let mut panel = ImagePanel::new();
        panel.path_input.set(&format!("  {}  ", path.display()));
        assert!(panel.load_from_path_input());
        assert_eq!(panel.upload().unwrap().mime_type, "image/webp");
    }
}
