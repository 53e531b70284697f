use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

/// Display region whose contents are replaced wholesale on every update.
pub trait RenderTarget {
    fn replace(&mut self, markup: &str) -> io::Result<()>;
}

#[derive(Debug, Default)]
pub struct StdoutTarget;

impl RenderTarget for StdoutTarget {
    fn replace(&mut self, markup: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{markup}")?;
        stdout.flush()
    }
}

#[derive(Debug)]
pub struct HtmlFileTarget {
    path: PathBuf,
    base_href: Option<String>,
}

impl HtmlFileTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            base_href: None,
        }
    }

    // Icon paths are absolute, so a page opened from disk needs a base.
    pub fn with_base_href(mut self, base_href: impl Into<String>) -> Self {
        self.base_href = Some(base_href.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn page(&self, markup: &str) -> String {
        let base = self
            .base_href
            .as_deref()
            .map(|href| format!("<base href=\"{href}\">"))
            .unwrap_or_default();
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n{base}<title>podvis</title>\n</head>\n<body>\n<div id=\"podinfo\">{markup}</div>\n</body>\n</html>\n"
        )
    }
}

impl RenderTarget for HtmlFileTarget {
    fn replace(&mut self, markup: &str) -> io::Result<()> {
        fs::write(&self.path, self.page(markup))
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryTarget {
    pub latest: String,
    pub renders: usize,
}

impl RenderTarget for MemoryTarget {
    fn replace(&mut self, markup: &str) -> io::Result<()> {
        self.latest.clear();
        self.latest.push_str(markup);
        self.renders += 1;
        Ok(())
    }
}
