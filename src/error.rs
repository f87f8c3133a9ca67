use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("animated image contained no decodable frames")]
    NoFrames,

    // Fatal: the fallback is the last resort
    #[error("could not load fallback image {path:?}: {source}")]
    Fallback {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to create display: {0}")]
    Display(#[from] glium::backend::glutin::DisplayCreationError),

    #[error("failed to link shader program: {0}")]
    Program(#[from] glium::ProgramCreationError),

    #[error("failed to create vertex buffer: {0}")]
    VertexBuffer(#[from] glium::vertex::BufferCreationError),

    #[error("failed to create index buffer: {0}")]
    IndexBuffer(#[from] glium::index::BufferCreationError),

    #[error("failed to create texture: {0}")]
    Texture(#[from] glium::texture::TextureCreationError),

    #[error("draw call failed: {0}")]
    Draw(#[from] glium::DrawError),

    #[error("failed to present frame: {0}")]
    SwapBuffers(#[from] glium::SwapBuffersError),
}

impl Error {
    /// Errors the refresh cycle recovers from by showing the fallback image.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Fetch(_) | Error::Decode(_) | Error::NoFrames)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_and_decode_failures_are_recoverable() {
        let decode = image::load_from_memory(b"not an image").unwrap_err();
        assert!(Error::Decode(decode).is_recoverable());
        assert!(Error::NoFrames.is_recoverable());
    }

    #[test]
    fn fallback_failure_is_fatal() {
        let source = image::open("/nonexistent/error.png").unwrap_err();
        let err = Error::Fallback {
            path: PathBuf::from("/nonexistent/error.png"),
            source,
        };
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("error.png"));
    }
}
