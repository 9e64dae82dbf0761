//! Manifest parsing
//!
//! Turns raw document text into an [`ObjectGraph`] plus a
//! [`DocumentLayout`] of byte positions. Sections are delimited by
//! `/* Begin <isa> section */` … `/* End <isa> section */` marker lines;
//! records inside a section have the shape
//! `ID /* annotation */ = { key = value; ... };` with the annotation
//! optional, values bare or quoted, and list values parenthesized with
//! trailing commas.
//!
//! The scanner tolerates the grammar's looseness (comments anywhere
//! trivia is allowed, multi-line records, unknown keys) but insists on
//! the four modeled sections and a resolvable root group.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use pbx_fs::EntryPath;
use pbx_model::{BuildFile, BuildPhase, FileKind, FileReference, Group, ObjectGraph, ObjectId};

use crate::error::{Error, Result};
use crate::layout::{DocumentLayout, SectionKind, SectionSpan};
use crate::text::unquote;

/// Every identifier-shaped token in a document, modeled or not.
static ANY_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9A-F]{24}\b").expect("Invalid identifier regex"));

/// Everything a successful parse produces.
#[derive(Debug, Clone)]
pub(crate) struct ParsedParts {
    pub graph: ObjectGraph,
    pub layout: DocumentLayout,
    pub root_group: ObjectId,
    pub primary_phase: ObjectId,
}

pub(crate) fn parse_source(source: &str) -> Result<ParsedParts> {
    let mut layout = DocumentLayout::new();
    let mut graph = ObjectGraph::new();

    let build_files_span = require_section(source, SectionKind::BuildFiles, &mut layout)?;
    let file_refs_span = require_section(source, SectionKind::FileReferences, &mut layout)?;
    let groups_span = require_section(source, SectionKind::Groups, &mut layout)?;
    let phases_span = require_section(source, SectionKind::SourcesPhases, &mut layout)?;

    for rec in scan_records(source, file_refs_span.body.clone())? {
        let path_attr = attr_value(rec.body, "path");
        let name_attr = attr_value(rec.body, "name");
        let declared = attr_value(rec.body, "lastKnownFileType")
            .or_else(|| attr_value(rec.body, "explicitFileType"));

        let Some(raw_path) = path_attr.or_else(|| name_attr.clone()) else {
            return Err(Error::malformed(
                rec.start,
                format!("file reference {} has no path", rec.id),
            ));
        };
        let path = EntryPath::new(raw_path);
        let name = name_attr
            .or_else(|| rec.annotation.clone())
            .unwrap_or_else(|| path.file_name().to_string());
        let kind = declared
            .map(|d| FileKind::from_declared(&d))
            .unwrap_or_else(|| FileKind::from_path(&path));

        graph.add_file_reference(FileReference {
            id: rec.id,
            name,
            path,
            kind,
        });
    }

    for rec in scan_records(source, build_files_span.body.clone())? {
        let Some(file_ref) = attr_value(rec.body, "fileRef") else {
            return Err(Error::malformed(
                rec.start,
                format!("build file {} has no fileRef", rec.id),
            ));
        };
        let file_ref = ObjectId::parse(file_ref.trim())?;
        graph.add_build_file(BuildFile {
            id: rec.id,
            file_ref,
        });
    }

    for rec in scan_records(source, groups_span.body.clone())? {
        let Some((children, insert_at)) = list_values(source, &rec, "children")? else {
            return Err(Error::malformed(
                rec.start,
                format!("group {} has no children list", rec.id),
            ));
        };
        let name = attr_value(rec.body, "name")
            .or_else(|| attr_value(rec.body, "path"))
            .or_else(|| rec.annotation.clone());
        layout.set_list_insert(rec.id.clone(), insert_at);
        graph.add_group(Group {
            id: rec.id,
            name,
            children,
        });
    }

    let mut primary_phase = None;
    for rec in scan_records(source, phases_span.body.clone())? {
        let Some((members, insert_at)) = list_values(source, &rec, "files")? else {
            return Err(Error::malformed(
                rec.start,
                format!("build phase {} has no files list", rec.id),
            ));
        };
        let name = rec
            .annotation
            .clone()
            .unwrap_or_else(|| "Sources".to_string());
        layout.set_list_insert(rec.id.clone(), insert_at);
        if primary_phase.is_none() {
            primary_phase = Some(rec.id.clone());
        }
        graph.add_phase(BuildPhase {
            id: rec.id,
            name,
            members,
        });
    }
    let primary_phase = primary_phase.ok_or(Error::PrimaryPhaseNotFound)?;

    let root_group = locate_root_group(source, &graph)?;

    // Identifiers living in sections the model does not represent still
    // count for collision avoidance.
    for m in ANY_ID_REGEX.find_iter(source) {
        if let Ok(id) = ObjectId::parse(m.as_str())
            && !graph.contains_id(&id)
        {
            graph.add_foreign_id(id);
        }
    }

    tracing::debug!(
        file_refs = graph.file_reference_count(),
        build_files = graph.build_file_count(),
        "parsed manifest"
    );

    Ok(ParsedParts {
        graph,
        layout,
        root_group,
        primary_phase,
    })
}

/// The root group is named by the project record's mainGroup attribute,
/// reached through the section the model otherwise ignores.
fn locate_root_group(source: &str, graph: &ObjectGraph) -> Result<ObjectId> {
    let span = section_span(source, SectionKind::Project).ok_or(Error::RootGroupNotFound)?;
    for rec in scan_records(source, span.body.clone())? {
        if let Some(main_group) = attr_value(rec.body, "mainGroup") {
            let id = ObjectId::parse(main_group.trim())?;
            if graph.group(&id).is_none() {
                return Err(Error::RootGroupNotFound);
            }
            return Ok(id);
        }
    }
    Err(Error::RootGroupNotFound)
}

fn require_section(
    source: &str,
    kind: SectionKind,
    layout: &mut DocumentLayout,
) -> Result<SectionSpan> {
    let span = section_span(source, kind).ok_or(Error::MissingSection {
        name: kind.isa_name(),
    })?;
    layout.set_section(span.clone());
    Ok(span)
}

/// Locate one section's Begin/End markers and compute its body span.
fn section_span(source: &str, kind: SectionKind) -> Option<SectionSpan> {
    let begin_marker = format!("/* Begin {} section */", kind.isa_name());
    let end_marker = format!("/* End {} section */", kind.isa_name());

    let begin = source.find(&begin_marker)?;
    let body_start = source[begin..].find('\n').map(|i| begin + i + 1)?;
    let end = source[body_start..].find(&end_marker).map(|i| body_start + i)?;
    let insert_at = line_start(source, end);

    Some(SectionSpan {
        kind,
        body: body_start..insert_at,
        insert_at,
    })
}

/// One `ID /* annotation */ = { ... };` record, positions absolute.
#[derive(Debug)]
pub(crate) struct RawRecord<'a> {
    pub id: ObjectId,
    pub annotation: Option<String>,
    /// Text inside the braces.
    pub body: &'a str,
    /// Absolute span of `body`.
    pub body_range: Range<usize>,
    /// Absolute offset of the identifier token.
    pub start: usize,
}

pub(crate) fn scan_records(source: &str, body: Range<usize>) -> Result<Vec<RawRecord<'_>>> {
    let mut records = Vec::new();
    let end = body.end;
    let mut pos = body.start;

    loop {
        pos = skip_trivia(source, pos, end);
        if pos >= end {
            break;
        }

        let token_end = id_token_end(source, pos, end);
        let token = &source[pos..token_end];
        let id = ObjectId::parse(token).map_err(|_| {
            Error::malformed(pos, format!("expected object identifier, found {token:?}"))
        })?;
        let start = pos;
        pos = token_end;

        pos = skip_ws(source, pos, end);
        let annotation = if source[pos..end].starts_with("/*") {
            let comment_end = source[pos..end]
                .find("*/")
                .map(|i| pos + i + 2)
                .ok_or_else(|| Error::malformed(pos, "unterminated comment"))?;
            let text = source[pos + 2..comment_end - 2].trim().to_string();
            pos = comment_end;
            Some(text)
        } else {
            None
        };

        pos = skip_trivia(source, pos, end);
        if !source[pos..end].starts_with('=') {
            return Err(Error::malformed(pos, "expected '=' after identifier"));
        }
        pos = skip_trivia(source, pos + 1, end);
        if !source[pos..end].starts_with('{') {
            return Err(Error::malformed(pos, "expected '{' to open record"));
        }

        let close = matching_delim(source, pos, end, b'{', b'}')
            .ok_or_else(|| Error::malformed(pos, "unbalanced braces in record"))?;
        let body_range = pos + 1..close;
        records.push(RawRecord {
            id,
            annotation,
            body: &source[body_range.clone()],
            body_range,
            start,
        });

        pos = skip_trivia(source, close + 1, end);
        if source[pos..end].starts_with(';') {
            pos += 1;
        }
    }

    Ok(records)
}

/// Extract a scalar attribute value from a record body.
///
/// Quoted values are unquoted; bare values are truncated before any
/// trailing annotation comment (`fileRef = ID /* name */;`).
pub(crate) fn attr_value(body: &str, key: &str) -> Option<String> {
    let mut search = 0;
    while let Some(found) = body[search..].find(key) {
        let at = search + found;
        search = at + key.len();

        let bounded_before = at == 0
            || !body[..at]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
        if !bounded_before {
            continue;
        }

        let mut pos = at + key.len();
        pos += body[pos..].len() - body[pos..].trim_start().len();
        if !body[pos..].starts_with('=') {
            continue;
        }
        pos += 1;
        pos += body[pos..].len() - body[pos..].trim_start().len();

        if body[pos..].starts_with('"') {
            let close = closing_quote(body, pos)?;
            return Some(unquote(&body[pos..close + 1]));
        }

        let raw = &body[pos..];
        let value_end = raw.find(';').unwrap_or(raw.len());
        let mut value = &raw[..value_end];
        if let Some(comment) = value.find("/*") {
            value = &value[..comment];
        }
        return Some(value.trim().to_string());
    }
    None
}

/// Extract an ordered identifier list (`children = ( … );` or
/// `files = ( … );`), returning the member ids and the absolute offset
/// where a new member line would be appended: the start of the line
/// holding the list's closing parenthesis.
fn list_values(
    source: &str,
    rec: &RawRecord<'_>,
    key: &str,
) -> Result<Option<(Vec<ObjectId>, usize)>> {
    let body = rec.body;
    let mut search = 0;
    while let Some(found) = body[search..].find(key) {
        let at = search + found;
        search = at + key.len();

        let bounded_before = at == 0
            || !body[..at]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
        if !bounded_before {
            continue;
        }

        let mut pos = at + key.len();
        pos += body[pos..].len() - body[pos..].trim_start().len();
        if !body[pos..].starts_with('=') {
            continue;
        }
        pos += 1;
        pos += body[pos..].len() - body[pos..].trim_start().len();
        if !body[pos..].starts_with('(') {
            continue;
        }

        let close = matching_delim(body, pos, body.len(), b'(', b')')
            .ok_or_else(|| Error::malformed(rec.start, "unbalanced parentheses in list"))?;

        let mut members = Vec::new();
        for entry in split_list_entries(&body[pos + 1..close]) {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let token = entry
                .split_whitespace()
                .next()
                .unwrap_or_default();
            let id = ObjectId::parse(token).map_err(|_| {
                Error::malformed(
                    rec.start,
                    format!("list entry is not an identifier: {entry:?}"),
                )
            })?;
            members.push(id);
        }

        let close_abs = rec.body_range.start + close;
        let insert_at = line_start(source, close_abs);
        return Ok(Some((members, insert_at)));
    }
    Ok(None)
}

/// Split a list body on commas, ignoring commas inside quotes/comments.
fn split_list_entries(list: &str) -> Vec<&str> {
    let bytes = list.as_bytes();
    let mut entries = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                i = closing_quote(list, i).map(|q| q + 1).unwrap_or(bytes.len());
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = list[i..]
                    .find("*/")
                    .map(|j| i + j + 2)
                    .unwrap_or(bytes.len());
            }
            b',' => {
                entries.push(&list[start..i]);
                i += 1;
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        entries.push(&list[start..]);
    }
    entries
}

/// Offset of the first byte of the line containing `offset`.
fn line_start(source: &str, offset: usize) -> usize {
    source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

fn id_token_end(source: &str, pos: usize, end: usize) -> usize {
    let bytes = source.as_bytes();
    let mut i = pos;
    while i < end && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        i += 1;
    }
    i
}

fn skip_ws(source: &str, mut pos: usize, end: usize) -> usize {
    let bytes = source.as_bytes();
    while pos < end && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// Skip whitespace and comments (block and line).
fn skip_trivia(source: &str, mut pos: usize, end: usize) -> usize {
    loop {
        pos = skip_ws(source, pos, end);
        if source[pos..end].starts_with("/*") {
            match source[pos..end].find("*/") {
                Some(i) => pos += i + 2,
                None => return end,
            }
        } else if source[pos..end].starts_with("//") {
            match source[pos..end].find('\n') {
                Some(i) => pos += i,
                None => return end,
            }
        } else {
            return pos;
        }
    }
}

/// Find the matching close delimiter, honoring quotes and comments.
fn matching_delim(source: &str, open: usize, end: usize, open_ch: u8, close_ch: u8) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut depth = 0usize;
    let mut i = open;
    while i < end {
        let b = bytes[i];
        if b == b'"' {
            i = closing_quote(source, i)? + 1;
            continue;
        }
        if b == b'/' && bytes.get(i + 1) == Some(&b'*') {
            i = source[i..end].find("*/").map(|j| i + j + 2)?;
            continue;
        }
        if b == open_ch {
            depth += 1;
        } else if b == close_ch {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

/// Index of the closing quote for a string starting at `open`.
fn closing_quote(source: &str, open: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}
