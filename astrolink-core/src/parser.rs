use crate::ast::{BodyDecl, CameraDecl, Scenario, WormholeDecl};
use crate::diagnostics::Span;
use glam::Vec3;
use thiserror::Error;

/// Parse error with optional span information
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{message}")]
    SyntaxError {
        message: String,
        span: Option<Span>,
    },
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Option<Span>) -> Self {
        Self::SyntaxError {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::SyntaxError { span, .. } => *span,
        }
    }
}

/// Byte offsets of each line start, for building spans
struct ParseContext {
    line_offsets: Vec<usize>,
}

impl ParseContext {
    fn new(source: &str) -> Self {
        let mut line_offsets = vec![0];
        let mut offset = 0;
        for ch in source.chars() {
            offset += ch.len_utf8();
            if ch == '\n' {
                line_offsets.push(offset);
            }
        }
        Self { line_offsets }
    }

    fn line_start(&self, line: usize) -> usize {
        self.line_offsets.get(line).copied().unwrap_or(0)
    }

    fn line_span(&self, line: usize, len: usize) -> Span {
        let start = self.line_start(line);
        Span::new(start, start + len)
    }
}

/// Parse a scenario from source text
pub fn parse_scenario(source: &str) -> Result<Scenario, ParseError> {
    let ctx = ParseContext::new(source);
    let mut scenario = Scenario::default();

    for (i, raw) in source.lines().enumerate() {
        let span = Some(ctx.line_span(i, raw.len()));
        let line = strip_comment(raw).trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with("body ") {
            scenario.bodies.push(parse_body(line, span)?);
        } else if line.starts_with("wormhole ") {
            scenario.wormholes.push(parse_wormhole(line, span)?);
        } else if line.starts_with("camera ") {
            scenario.cameras.push(parse_camera(line, span)?);
        } else {
            return Err(ParseError::new(format!("Unknown statement: {}", line), span));
        }
    }

    Ok(scenario)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn parse_body(line: &str, span: Option<Span>) -> Result<BodyDecl, ParseError> {
    let rest = line
        .strip_prefix("body ")
        .ok_or_else(|| ParseError::new("Expected 'body' keyword", span))?;

    let at_pos = rest.find(" at ").ok_or_else(|| {
        ParseError::new(format!("Expected 'at' in body declaration: {}", line), span)
    })?;

    let name = rest[..at_pos].trim().to_string();
    if !is_valid_identifier(&name) {
        return Err(ParseError::new(format!("Invalid body name '{}'", name), span));
    }

    let (position, rest) = parse_vec3(&rest[at_pos + 4..], line, span)?;

    let mut mass = None;
    let mut radius = None;
    for (key, value) in parse_keyed_numbers(rest, line, span)? {
        match key {
            "mass" => mass = Some(value),
            "radius" => radius = Some(value),
            other => {
                return Err(ParseError::new(
                    format!("Unexpected '{}' in body declaration: {}", other, line),
                    span,
                ))
            }
        }
    }

    let mass = mass.ok_or_else(|| {
        ParseError::new(format!("Expected 'mass' in body declaration: {}", line), span)
    })?;

    Ok(BodyDecl {
        name,
        position,
        mass,
        radius,
        span,
    })
}

fn parse_wormhole(line: &str, span: Option<Span>) -> Result<WormholeDecl, ParseError> {
    let rest = line
        .strip_prefix("wormhole ")
        .ok_or_else(|| ParseError::new("Expected 'wormhole' keyword", span))?
        .trim_start();

    let rest = rest.strip_prefix("at ").ok_or_else(|| {
        ParseError::new(format!("Expected 'at' in wormhole declaration: {}", line), span)
    })?;
    let (a, rest) = parse_vec3(rest, line, span)?;

    let rest = rest.trim_start().strip_prefix("to ").ok_or_else(|| {
        ParseError::new(format!("Expected 'to' in wormhole declaration: {}", line), span)
    })?;
    let (b, rest) = parse_vec3(rest, line, span)?;

    if !rest.trim().is_empty() {
        return Err(ParseError::new(
            format!("Unexpected trailing input in wormhole declaration: {}", line),
            span,
        ));
    }

    Ok(WormholeDecl { a, b, span })
}

fn parse_camera(line: &str, span: Option<Span>) -> Result<CameraDecl, ParseError> {
    let rest = line
        .strip_prefix("camera ")
        .ok_or_else(|| ParseError::new("Expected 'camera' keyword", span))?
        .trim_start();

    if let Some(rest) = rest.strip_prefix("orbit") {
        let mut alpha = None;
        let mut beta = None;
        let mut radius = None;
        for (key, value) in parse_keyed_numbers(rest, line, span)? {
            match key {
                "alpha" => alpha = Some(value),
                "beta" => beta = Some(value),
                "radius" => radius = Some(value),
                other => {
                    return Err(ParseError::new(
                        format!("Unexpected '{}' in camera orbit: {}", other, line),
                        span,
                    ))
                }
            }
        }
        let missing = |key: &str| {
            ParseError::new(format!("Expected '{}' in camera orbit: {}", key, line), span)
        };
        return Ok(CameraDecl::Orbit {
            alpha: alpha.ok_or_else(|| missing("alpha"))?,
            beta: beta.ok_or_else(|| missing("beta"))?,
            radius: radius.ok_or_else(|| missing("radius"))?,
            span,
        });
    }

    if let Some(rest) = rest.strip_prefix("lock ") {
        let mut parts = rest.trim().splitn(2, char::is_whitespace);
        let body = parts.next().unwrap_or("").to_string();
        if !is_valid_identifier(&body) {
            return Err(ParseError::new(
                format!("Expected body name in camera lock: {}", line),
                span,
            ));
        }
        let mut distance = None;
        for (key, value) in parse_keyed_numbers(parts.next().unwrap_or(""), line, span)? {
            match key {
                "distance" => distance = Some(value),
                other => {
                    return Err(ParseError::new(
                        format!("Unexpected '{}' in camera lock: {}", other, line),
                        span,
                    ))
                }
            }
        }
        let distance = distance.ok_or_else(|| {
            ParseError::new(format!("Expected 'distance' in camera lock: {}", line), span)
        })?;
        return Ok(CameraDecl::Lock {
            body,
            distance,
            span,
        });
    }

    Err(ParseError::new(
        format!("Expected 'orbit' or 'lock' after 'camera': {}", line),
        span,
    ))
}

/// Parse `(x, y, z)` at the start of `s`, returning the vector and the rest
fn parse_vec3<'a>(
    s: &'a str,
    line: &str,
    span: Option<Span>,
) -> Result<(Vec3, &'a str), ParseError> {
    let s = s.trim_start();
    if !s.starts_with('(') {
        return Err(ParseError::new(format!("Expected '(' in position: {}", line), span));
    }
    let end = s
        .find(')')
        .ok_or_else(|| ParseError::new(format!("Expected ')' in position: {}", line), span))?;

    let coords: Vec<&str> = s[1..end].split(',').map(|c| c.trim()).collect();
    if coords.len() != 3 {
        return Err(ParseError::new(
            format!("Expected three coordinates in position: {}", line),
            span,
        ));
    }

    let x = parse_number(coords[0], span)?;
    let y = parse_number(coords[1], span)?;
    let z = parse_number(coords[2], span)?;

    Ok((Vec3::new(x, y, z), &s[end + 1..]))
}

/// Parse `key value key value ...` pairs of numbers
fn parse_keyed_numbers<'a>(
    s: &'a str,
    line: &str,
    span: Option<Span>,
) -> Result<Vec<(&'a str, f32)>, ParseError> {
    let tokens: Vec<&str> = s.split_whitespace().collect();
    if tokens.len() % 2 != 0 {
        return Err(ParseError::new(
            format!("Expected a value after '{}': {}", tokens[tokens.len() - 1], line),
            span,
        ));
    }
    tokens
        .chunks(2)
        .map(|pair| Ok((pair[0], parse_number(pair[1], span)?)))
        .collect()
}

fn parse_number(s: &str, span: Option<Span>) -> Result<f32, ParseError> {
    s.parse::<f32>()
        .map_err(|_| ParseError::new(format!("Invalid number: '{}'", s), span))
}

fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
