//! Typed parser for the time-series details document.
//!
//! The wire format is XML; nothing outside this module sees it. The parser
//! produces [`TimeSeriesDetails`], from which a [`Dataset`](super::Dataset)
//! is built.

use std::str::FromStr;

use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

use crate::annotations::LayerCounts;
use crate::error::DecodeError;

/// Unit assumed when a channel does not declare one.
pub const DEFAULT_UNIT: &str = "uV";

/// Metadata of one channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Position in the dataset's channel list, starting at 0.
    pub index: usize,
    pub label: String,
    /// Sampling rate in Hz as recorded.
    pub sample_rate: f64,
    pub unit: String,
    pub revision_id: Option<String>,
    pub acquisition: Option<String>,
    pub number_of_samples: Option<u64>,
    /// Recording start, usec.
    pub start_time: Option<i64>,
    /// Recording duration, usec.
    pub duration: Option<f64>,
    pub voltage_conversion_factor: Option<f64>,
    pub min_sample: Option<i64>,
    pub max_sample: Option<i64>,
}

/// One derivation in a montage: a channel, optionally referenced to another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MontagePair {
    pub channel: String,
    pub reference: Option<String>,
}

/// The channel ordering/transform currently configured on a dataset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Montage {
    pub name: String,
    pub pairs: Vec<MontagePair>,
}

/// Everything the details document says about a snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSeriesDetails {
    pub channels: Vec<Channel>,
    pub layers: LayerCounts,
    pub montage: Option<Montage>,
}

/// Parse the details document. Any missing required element or bad number
/// fails the whole document.
pub fn parse_time_series_details(xml: &str) -> Result<TimeSeriesDetails, DecodeError> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();

    let details = child(root, "details").ok_or_else(|| DecodeError::MissingElement {
        element: "details".to_string(),
        context: root.tag_name().name().to_string(),
    })?;

    let channels = details
        .children()
        .filter(|n| n.has_tag_name("detail"))
        .enumerate()
        .map(|(index, node)| parse_channel(index, node))
        .collect::<Result<Vec<_>, _>>()?;

    let layers = match child(root, "annotationLayers") {
        Some(node) => parse_layers(node)?,
        None => LayerCounts::new(),
    };

    let montage = child(root, "montage").map(parse_montage).transpose()?;

    Ok(TimeSeriesDetails {
        channels,
        layers,
        montage,
    })
}

fn parse_channel(index: usize, node: Node<'_, '_>) -> Result<Channel, DecodeError> {
    let context = format!("channel detail #{}", index);

    let label = required_text(node, "channelLabel", &context)?;
    let sample_rate = parse_number("sampleRate", &required_text(node, "sampleRate", &context)?)?;

    Ok(Channel {
        index,
        label,
        sample_rate,
        unit: text(node, "unit").unwrap_or_else(|| DEFAULT_UNIT.to_string()),
        revision_id: text(node, "revisionId"),
        acquisition: text(node, "acquisition"),
        number_of_samples: optional_number(node, "numberOfSamples")?,
        start_time: optional_number(node, "startTime")?,
        duration: optional_number(node, "duration")?,
        voltage_conversion_factor: optional_number(node, "voltageConversionFactor")?,
        min_sample: optional_number(node, "minSample")?,
        max_sample: optional_number(node, "maxSample")?,
    })
}

fn parse_layers(node: Node<'_, '_>) -> Result<LayerCounts, DecodeError> {
    let mut layers = LayerCounts::new();
    for layer in node.children().filter(|n| n.has_tag_name("layer")) {
        let name = required_attribute(layer, "name", "annotation layer")?;
        let count = parse_number("layer count", &required_attribute(layer, "count", &name)?)?;
        layers.insert(name, count);
    }
    Ok(layers)
}

fn parse_montage(node: Node<'_, '_>) -> Result<Montage, DecodeError> {
    let name = required_attribute(node, "name", "montage")?;
    let pairs = node
        .children()
        .filter(|n| n.has_tag_name("pair"))
        .map(|pair| -> Result<MontagePair, DecodeError> {
            Ok(MontagePair {
                channel: required_attribute(pair, "channel", &name)?,
                reference: pair
                    .attribute("ref")
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(String::from),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Montage { name, pairs })
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

fn text(node: Node<'_, '_>, name: &str) -> Option<String> {
    child(node, name)
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
}

fn required_text(node: Node<'_, '_>, name: &str, context: &str) -> Result<String, DecodeError> {
    text(node, name).ok_or_else(|| DecodeError::MissingElement {
        element: name.to_string(),
        context: context.to_string(),
    })
}

fn required_attribute(
    node: Node<'_, '_>,
    name: &str,
    context: &str,
) -> Result<String, DecodeError> {
    node.attribute(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .ok_or_else(|| DecodeError::MissingElement {
            element: format!("@{}", name),
            context: context.to_string(),
        })
}

fn optional_number<T: FromStr>(node: Node<'_, '_>, name: &str) -> Result<Option<T>, DecodeError> {
    text(node, name).map(|v| parse_number(name, &v)).transpose()
}

fn parse_number<T: FromStr>(field: &str, value: &str) -> Result<T, DecodeError> {
    value.trim().parse().map_err(|_| DecodeError::InvalidNumber {
        field: field.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAILS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<dataSnapshot>
  <details>
    <detail>
      <channelLabel>LEFT_01</channelLabel>
      <sampleRate>500.0</sampleRate>
      <revisionId>rev-1</revisionId>
      <numberOfSamples>1800000</numberOfSamples>
      <startTime>0</startTime>
      <duration>3600000000.0</duration>
      <voltageConversionFactor>0.25</voltageConversionFactor>
    </detail>
    <detail>
      <channelLabel>LEFT_02</channelLabel>
      <sampleRate>500.0</sampleRate>
      <unit>mV</unit>
    </detail>
  </details>
  <annotationLayers>
    <layer name="Seizures" count="12"/>
    <layer name="Artifacts" count="0"/>
  </annotationLayers>
  <montage name="Bipolar">
    <pair channel="LEFT_01" ref="LEFT_02"/>
    <pair channel="LEFT_02"/>
  </montage>
</dataSnapshot>"#;

    #[test]
    fn parses_channels_in_document_order() {
        let details = parse_time_series_details(DETAILS).unwrap();
        assert_eq!(details.channels.len(), 2);

        let first = &details.channels[0];
        assert_eq!(first.index, 0);
        assert_eq!(first.label, "LEFT_01");
        assert_eq!(first.sample_rate, 500.0);
        assert_eq!(first.unit, DEFAULT_UNIT);
        assert_eq!(first.number_of_samples, Some(1_800_000));
        assert_eq!(first.voltage_conversion_factor, Some(0.25));

        let second = &details.channels[1];
        assert_eq!(second.index, 1);
        assert_eq!(second.unit, "mV");
        assert_eq!(second.revision_id, None);
    }

    #[test]
    fn parses_layer_directory_and_montage() {
        let details = parse_time_series_details(DETAILS).unwrap();
        assert_eq!(details.layers.get("Seizures"), Some(&12));
        assert_eq!(details.layers.get("Artifacts"), Some(&0));

        let montage = details.montage.unwrap();
        assert_eq!(montage.name, "Bipolar");
        assert_eq!(montage.pairs[0].reference.as_deref(), Some("LEFT_02"));
        assert_eq!(montage.pairs[1].reference, None);
    }

    #[test]
    fn layers_and_montage_are_optional() {
        let details = parse_time_series_details(
            "<dataSnapshot><details><detail><channelLabel>C3</channelLabel>\
             <sampleRate>256</sampleRate></detail></details></dataSnapshot>",
        )
        .unwrap();
        assert!(details.layers.is_empty());
        assert!(details.montage.is_none());
    }

    #[test]
    fn missing_sample_rate_fails() {
        let err = parse_time_series_details(
            "<dataSnapshot><details><detail><channelLabel>C3</channelLabel>\
             </detail></details></dataSnapshot>",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MissingElement { ref element, .. } if element == "sampleRate"
        ));
    }

    #[test]
    fn bad_number_fails() {
        let err = parse_time_series_details(
            "<dataSnapshot><details><detail><channelLabel>C3</channelLabel>\
             <sampleRate>fast</sampleRate></detail></details></dataSnapshot>",
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::InvalidNumber { .. }));
    }

    #[test]
    fn malformed_xml_fails() {
        assert!(matches!(
            parse_time_series_details("<dataSnapshot><details>"),
            Err(DecodeError::Xml(_))
        ));
    }
}
