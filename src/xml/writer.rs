//! Writer für die RNGAction-XML-Projektion der Event-Bäume.
//!
//! Reine, lesende Projektion in Pre-Order: Wurzel-Reihenfolge,
//! Success vor Failure, Geschwister in Sequenz-Reihenfolge.

use crate::core::{Event, Node, NodeKind};
use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event as XmlEvent};
use quick_xml::Writer;
use std::io::Cursor;

/// Schreibt alle Events als XML-Dokument.
///
/// # Parameter
/// - `events`: Die zu exportierenden Events
/// - `indent`: Einrückung in Leerzeichen (0 = ohne Zeilenumbrüche)
pub fn write_session_xml(events: &[Event], indent: usize) -> Result<String> {
    let mut writer = make_writer(indent);
    writer.write_event(XmlEvent::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(XmlEvent::Start(BytesStart::new("RandomEvents")))?;
    for event in events {
        write_event(&mut writer, event)?;
    }
    writer.write_event(XmlEvent::End(BytesEnd::new("RandomEvents")))?;
    finish(writer)
}

/// Schreibt ein einzelnes Event als `<ScriptedEvent>`-Fragment.
pub fn write_event_xml(event: &Event, indent: usize) -> Result<String> {
    let mut writer = make_writer(indent);
    write_event(&mut writer, event)?;
    finish(writer)
}

fn make_writer(indent: usize) -> Writer<Cursor<Vec<u8>>> {
    if indent == 0 {
        Writer::new(Cursor::new(Vec::new()))
    } else {
        Writer::new_with_indent(Cursor::new(Vec::new()), b' ', indent)
    }
}

fn finish(writer: Writer<Cursor<Vec<u8>>>) -> Result<String> {
    let bytes = writer.into_inner().into_inner();
    let mut output = String::from_utf8(bytes)?;
    output.push('\n');
    Ok(output)
}

fn write_event<W: std::io::Write>(writer: &mut Writer<W>, event: &Event) -> Result<()> {
    let mut start = BytesStart::new("ScriptedEvent");
    start.push_attribute(("identifier", event.name.as_str()));
    if event.model.is_empty() {
        writer.write_event(XmlEvent::Empty(start))?;
        return Ok(());
    }
    writer.write_event(XmlEvent::Start(start))?;
    write_nodes(writer, &event.model)?;
    writer.write_event(XmlEvent::End(BytesEnd::new("ScriptedEvent")))?;
    Ok(())
}

fn write_nodes<W: std::io::Write>(writer: &mut Writer<W>, nodes: &[Node]) -> Result<()> {
    for node in nodes {
        write_node(writer, node)?;
    }
    Ok(())
}

fn write_node<W: std::io::Write>(writer: &mut Writer<W>, node: &Node) -> Result<()> {
    match &node.kind {
        NodeKind::Branch { params, children } => {
            let chance = format_probability(params.split_probability);
            let mut start = BytesStart::new("RNGAction");
            start.push_attribute(("chance", chance.as_str()));
            writer.write_event(XmlEvent::Start(start))?;
            write_outcome(writer, "Success", &children.on_success)?;
            write_outcome(writer, "Failure", &children.on_failure)?;
            writer.write_event(XmlEvent::End(BytesEnd::new("RNGAction")))?;
        }
        NodeKind::SpawnItem(params) => {
            let amount = params.amount.to_string();
            let quality = params.quality.level().to_string();
            let mut element = BytesStart::new("SpawnAction");
            element.push_attribute(("itemidentifier", params.item_identifier.as_str()));
            element.push_attribute(("amount", amount.as_str()));
            element.push_attribute(("quality", quality.as_str()));
            writer.write_event(XmlEvent::Empty(element))?;
        }
        NodeKind::SpawnCreature(params) => {
            let amount = params.count.to_string();
            let mut element = BytesStart::new("SpawnAction");
            element.push_attribute(("speciesname", params.creature_identifier.as_str()));
            element.push_attribute(("amount", amount.as_str()));
            element.push_attribute(("spawnlocation", params.spawn_location.xml_name()));
            element.push_attribute(("randomize", bool_attr(params.randomize)));
            writer.write_event(XmlEvent::Empty(element))?;
        }
        NodeKind::ApplyAffliction(params) => {
            let strength = format_number(params.strength);
            let mut element = BytesStart::new("AfflictionAction");
            element.push_attribute(("affliction", params.affliction_identifier.as_str()));
            element.push_attribute(("strength", strength.as_str()));
            element.push_attribute(("targettype", params.target.xml_name()));
            writer.write_event(XmlEvent::Empty(element))?;
        }
    }
    Ok(())
}

fn write_outcome<W: std::io::Write>(writer: &mut Writer<W>, tag: &str, nodes: &[Node]) -> Result<()> {
    if nodes.is_empty() {
        writer.write_event(XmlEvent::Empty(BytesStart::new(tag)))?;
        return Ok(());
    }
    writer.write_event(XmlEvent::Start(BytesStart::new(tag)))?;
    write_nodes(writer, nodes)?;
    writer.write_event(XmlEvent::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn bool_attr(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Wahrscheinlichkeit mit höchstens 4 Nachkommastellen, ohne Null-Überhang.
fn format_probability(value: f64) -> String {
    format_number(crate::core::sanitize_probability(value))
}

fn format_number(value: f64) -> String {
    let text = format!("{:.4}", value);
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
