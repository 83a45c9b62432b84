// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Movie credits, stored as an XML property list.

use std::borrow::Cow;

use nom::{
    IResult, Parser as _,
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::{char, digit1, hex_digit1, multispace0},
    combinator::{self, all_consuming, map_opt, opt},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{delimited, preceded, terminated},
};

use tagsync_core::atom::MovieInfo;

use super::{AtomParseError, AtomParseResult, RawAtom};

/// Maximum nesting of arrays and dictionaries.
const MAX_DEPTH: usize = 32;

/// The subset of property list values that is needed.
#[derive(Debug)]
enum Value<'a> {
    String(Cow<'a, str>),
    Array(Vec<Value<'a>>),
    Dict(Vec<(Cow<'a, str>, Value<'a>)>),
    Other,
}

impl Value<'_> {
    fn into_string(self) -> Option<String> {
        match self {
            Self::String(text) => Some(text.into_owned()),
            _ => None,
        }
    }

    /// Collects the `name` entries of an array of dicts.
    fn into_names(self) -> Vec<String> {
        let Self::Array(items) = self else {
            return Vec::new();
        };
        items
            .into_iter()
            .filter_map(|item| {
                let Value::Dict(entries) = item else {
                    return None;
                };
                entries
                    .into_iter()
                    .find(|(key, _)| key == "name")
                    .and_then(|(_, value)| value.into_string())
            })
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// Predefined entities and numeric character references.
fn char_reference(input: &str) -> IResult<&str, char> {
    let hex = map_opt(
        preceded(alt((tag("#x"), tag("#X"))), hex_digit1),
        |hex: &str| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32),
    );
    let dec = map_opt(preceded(char('#'), digit1), |dec: &str| {
        dec.parse().ok().and_then(char::from_u32)
    });
    delimited(
        char('&'),
        alt((
            hex,
            dec,
            combinator::value('<', tag("lt")),
            combinator::value('>', tag("gt")),
            combinator::value('&', tag("amp")),
            combinator::value('"', tag("quot")),
            combinator::value('\'', tag("apos")),
        )),
        char(';'),
    )
    .parse(input)
}

/// Unrecognized references are kept verbatim.
fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    let mut unescaped = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        unescaped.push_str(&rest[..start]);
        rest = &rest[start..];
        if let Ok((remainder, decoded)) = char_reference(rest) {
            unescaped.push(decoded);
            rest = remainder;
        } else {
            unescaped.push('&');
            rest = &rest[1..];
        }
    }
    unescaped.push_str(rest);
    Cow::Owned(unescaped)
}

/// Parses `<name/>` or `<name>...</name>` and returns the raw content.
fn leaf<'a>(input: &'a str, name: &str) -> IResult<&'a str, &'a str> {
    let (input, _) = (char('<'), tag(name)).parse(input)?;
    let (input, empty) = opt(tag("/>")).parse(input)?;
    if empty.is_some() {
        return Ok((input, ""));
    }
    let (input, _) = char('>').parse(input)?;
    let close = format!("</{name}>");
    terminated(take_until(close.as_str()), tag(close.as_str())).parse(input)
}

/// Parses `<name/>` or `<name>items...</name>`.
fn container<'a, O>(
    input: &'a str,
    name: &str,
    depth: usize,
    item: fn(&'a str, usize) -> IResult<&'a str, O>,
) -> IResult<&'a str, Vec<O>> {
    let (input, _) = (char('<'), tag(name)).parse(input)?;
    let (input, empty) = opt(tag("/>")).parse(input)?;
    if empty.is_some() {
        return Ok((input, Vec::new()));
    }
    let (input, _) = char('>').parse(input)?;
    if depth > MAX_DEPTH {
        return Err(nom::Err::Failure(Error::new(input, ErrorKind::TooLarge)));
    }
    let close = format!("</{name}>");
    terminated(
        many0(preceded(multispace0, |input| item(input, depth))),
        preceded(multispace0, tag(close.as_str())),
    )
    .parse(input)
}

fn dict_entry(input: &str, depth: usize) -> IResult<&str, (Cow<'_, str>, Value<'_>)> {
    let (input, key) = leaf(input, "key")?;
    let (input, value) = preceded(multispace0, |input| value(input, depth)).parse(input)?;
    Ok((input, (unescape(key), value)))
}

fn value(input: &str, depth: usize) -> IResult<&str, Value<'_>> {
    match container(input, "array", depth + 1, value) {
        Ok((input, items)) => return Ok((input, Value::Array(items))),
        Err(err @ nom::Err::Failure(_)) => return Err(err),
        Err(_) => (),
    }
    match container(input, "dict", depth + 1, dict_entry) {
        Ok((input, entries)) => return Ok((input, Value::Dict(entries))),
        Err(err @ nom::Err::Failure(_)) => return Err(err),
        Err(_) => (),
    }
    if let Ok((input, text)) = leaf(input, "string") {
        return Ok((input, Value::String(unescape(text))));
    }
    for name in ["integer", "real", "date", "data", "true", "false"] {
        if let Ok((input, _)) = leaf(input, name) {
            return Ok((input, Value::Other));
        }
    }
    Err(nom::Err::Error(Error::new(input, ErrorKind::Alt)))
}

/// Skips the XML declaration and the document type.
fn prolog(input: &str) -> IResult<&str, ()> {
    let (input, _) = many0(preceded(
        multispace0,
        alt((
            delimited(tag("<?"), take_until("?>"), tag("?>")),
            delimited(tag("<!"), take_until(">"), tag(">")),
        )),
    ))
    .parse(input)?;
    Ok((input, ()))
}

fn plist(input: &str) -> IResult<&str, Value<'_>> {
    let (input, ()) = prolog(input)?;
    let (input, _) = preceded(
        multispace0,
        (tag("<plist"), take_until(">"), char('>')),
    )
    .parse(input)?;
    let (input, value) = preceded(multispace0, |input| value(input, 0)).parse(input)?;
    let (input, _) = delimited(multispace0, tag("</plist>"), multispace0).parse(input)?;
    Ok((input, value))
}

impl RawAtom for MovieInfo {
    const NAME: &'static str = "iTunMOVI";

    fn parse(payload: &[u8]) -> AtomParseResult<Self> {
        let input = std::str::from_utf8(payload)?;
        let (_, root) = all_consuming(plist).parse(input)?;
        let Value::Dict(entries) = root else {
            return Err(AtomParseError::Malformed(
                "expected a dictionary".to_owned(),
            ));
        };
        let mut movie_info = Self::default();
        for (key, value) in entries {
            match key.as_ref() {
                "cast" => movie_info.cast = value.into_names(),
                "directors" => movie_info.directors = value.into_names(),
                "codirectors" => movie_info.codirectors = value.into_names(),
                "producers" => movie_info.producers = value.into_names(),
                "screenwriters" => movie_info.screenwriters = value.into_names(),
                "studio" => {
                    movie_info.studio = value
                        .into_string()
                        .map(|studio| studio.trim().to_owned())
                        .filter(|studio| !studio.is_empty());
                }
                _ => {
                    log::debug!("Ignoring movie info entry {key}");
                }
            }
        }
        Ok(movie_info)
    }
}
