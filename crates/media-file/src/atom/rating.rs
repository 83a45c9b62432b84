// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Content advisory rating, e.g. `mpaa|PG-13|300|Some violence`.

use nom::{
    IResult, Parser as _,
    bytes::complete::take_till,
    character::complete::{char, i32 as int32, space0},
    combinator::{all_consuming, opt, rest},
    sequence::{delimited, terminated},
};

use tagsync_core::atom::RatingInfo;

use super::{AtomParseError, AtomParseResult, RawAtom};

fn field(input: &str) -> IResult<&str, &str> {
    take_till(|c| c == '|').parse(input)
}

fn rating_info(input: &str) -> IResult<&str, RatingInfo> {
    let (input, (source, rating, sort_value, annotation)) = (
        terminated(field, char('|')),
        terminated(field, char('|')),
        terminated(delimited(space0, int32, space0), opt(char('|'))),
        rest,
    )
        .parse(input)?;
    let annotation = annotation.trim().trim_end_matches('|').trim();
    let rating_info = RatingInfo {
        source: source.trim().to_owned(),
        rating: rating.trim().to_owned(),
        sort_value,
        annotation: (!annotation.is_empty()).then(|| annotation.to_owned()),
    };
    Ok((input, rating_info))
}

impl RawAtom for RatingInfo {
    const NAME: &'static str = "iTunEXTC";

    fn parse(payload: &[u8]) -> AtomParseResult<Self> {
        let input = std::str::from_utf8(payload)?;
        let (_, rating_info) = all_consuming(rating_info).parse(input.trim())?;
        if rating_info.source.is_empty() {
            return Err(AtomParseError::Malformed(
                "missing rating source".to_owned(),
            ));
        }
        Ok(rating_info)
    }
}
