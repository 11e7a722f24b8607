//! Legacy method names, kept as thin forwards to the current API.

#![allow(deprecated)]

use crate::annotations::{Annotation, LayerCounts};
use crate::dataset::Dataset;
use crate::error::Error;
use crate::session::Session;

impl Session {
    #[deprecated(note = "use `Session::open`")]
    pub fn open_dataset(&self, name: &str) -> Result<Dataset<'_>, Error> {
        self.open(name)
    }

    /// Datasets hold nothing to release; dropping one is enough.
    #[deprecated(note = "drop the dataset instead")]
    pub fn close_dataset(&self, _dataset: Dataset<'_>) {}

    #[deprecated(note = "use `ConnectionConfig::endpoint_url`")]
    pub fn url_builder(&self, path: &str) -> Result<String, Error> {
        let segments = path.split('/').filter(|s| !s.is_empty() && *s != "services");
        Ok(self.config().endpoint_url(segments)?.to_string())
    }
}

impl Dataset<'_> {
    #[deprecated(note = "use `Dataset::channel_labels`")]
    pub fn get_channel_labels(&self) -> Vec<&str> {
        self.channel_labels()
    }

    #[deprecated(note = "use `Dataset::annotation_layers`")]
    pub fn get_annotation_layers(&self) -> Result<LayerCounts, Error> {
        self.annotation_layers()
    }

    #[deprecated(note = "use `Dataset::mutator().add`")]
    pub fn add_annotations(&self, annotations: &[Annotation]) -> Result<LayerCounts, Error> {
        self.mutator().add(annotations)
    }

    #[deprecated(note = "use `Dataset::mutator().move_layer`")]
    pub fn move_annotation_layer(&self, from_layer: &str, to_layer: &str) -> Result<u64, Error> {
        self.mutator().move_layer(from_layer, to_layer)
    }

    #[deprecated(note = "use `Dataset::mutator().delete_layer`")]
    pub fn delete_annotation_layer(&self, layer_name: &str) -> Result<u64, Error> {
        self.mutator().delete_layer(layer_name)
    }
}
