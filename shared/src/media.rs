//! 封面媒体分类
//!
//! 根据 URL 扩展名决定如何渲染封面：图片、视频、PDF 或不支持的文件。

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Pdf,
    Other,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "webm", "ogg"];

impl MediaKind {
    /// `None` 表示没有媒体
    pub fn from_url(url: Option<&str>) -> Option<Self> {
        let url = url.map(str::trim).filter(|u| !u.is_empty())?;
        Some(Self::from_extension(extension(url).as_deref()))
    }

    fn from_extension(ext: Option<&str>) -> Self {
        match ext {
            Some(e) if IMAGE_EXTENSIONS.contains(&e) => MediaKind::Image,
            Some(e) if VIDEO_EXTENSIONS.contains(&e) => MediaKind::Video,
            Some("pdf") => MediaKind::Pdf,
            _ => MediaKind::Other,
        }
    }
}

/// 取最后一个路径段的扩展名，忽略查询串和片段
fn extension(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let last = path.rsplit('/').next().unwrap_or(path);
    let (_, ext) = last.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(MediaKind::from_url(Some("https://cdn/a.PNG")), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_url(Some("/u/clip.webm")), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_url(Some("/u/doc.pdf?x=1")), Some(MediaKind::Pdf));
        assert_eq!(MediaKind::from_url(Some("/u/archive.zip")), Some(MediaKind::Other));
        assert_eq!(MediaKind::from_url(Some("https://host.com/noext")), Some(MediaKind::Other));
    }

    #[test]
    fn test_missing_url_means_no_media() {
        assert_eq!(MediaKind::from_url(None), None);
        assert_eq!(MediaKind::from_url(Some("  ")), None);
    }
}
