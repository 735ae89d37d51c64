//! Package renderers.
//!
//! [`StandardRenderer`] writes classes as PHP, documents as XML, static
//! files verbatim and the collected docs as a Markdown summary, in that
//! order, under a `Vendor_Module` root.

mod php;
mod readme;
mod xml;

pub use php::render_class;
pub use readme::render_summary;
pub use xml::{escape as escape_xml, render_document};

use splice_core::{
    application::ports::PackageRenderer,
    domain::{GeneratedPackage, MergedBuild, PackageBuilder, RelativePath},
    error::{SpliceError, SpliceResult},
};
use tracing::{debug, instrument};

use crate::config::RenderConfig;

/// Renderer for PHP classes, XML documents and a Markdown summary.
#[derive(Debug, Clone, Default)]
pub struct StandardRenderer {
    config: RenderConfig,
}

impl StandardRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }
}

impl PackageRenderer for StandardRenderer {
    fn summary_path(&self) -> SpliceResult<RelativePath> {
        RelativePath::try_new(&self.config.summary_file).map_err(|e| SpliceError::Configuration {
            message: format!("summary_file: {e}"),
        })
    }

    #[instrument(skip_all, fields(module = %build.module()))]
    fn render(&self, build: &MergedBuild) -> SpliceResult<GeneratedPackage> {
        let module = build.module();
        let mut package = PackageBuilder::new(module.module_name(), build.run_id());

        for class in build.classes() {
            let path = class.file_path()?;
            debug!(path = %path, "Rendering class");
            package.add_file(path, render_class(module, class, &self.config));
        }

        for document in build.documents() {
            debug!(path = %document.path, "Rendering document");
            let content = render_document(&document.path, &document.root, &self.config)?;
            package.add_file(document.path.clone(), content);
        }

        for file in build.static_files() {
            package.add_file(file.path.clone(), file.body.clone());
        }

        package.add_summary(self.summary_path()?, render_summary(module, build.docs()));
        package.add_warnings(build.warnings().iter().cloned());

        Ok(package.finish()?)
    }
}
