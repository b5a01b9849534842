//! SVG path data (`d` attribute) reading and writing.
//!
//! Every command is supported in both absolute and relative form. Elliptical arcs are read as cubic Béziers.

use std::fmt::Write;
use std::sync::LazyLock;

use glam::DVec2;
use kurbo::{Arc, Point, SvgArc, Vec2};
use regex::Regex;
use thiserror::Error;

use crate::path::{Path, PathCommand};
use crate::vector::Vector;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum PathDataError {
	#[error("unexpected `{0}` in path data")]
	UnexpectedToken(String),

	#[error("command `{0}` is missing coordinates")]
	MissingCoordinates(char),

	#[error("path data must start with a move command")]
	MissingMoveTo,
}

/// Largest distance between an elliptical arc and the cubics replacing it.
const ARC_TOLERANCE: f64 = 1e-3;

static TOKEN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?P<command>[A-Za-z])|(?P<number>[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)|(?P<separator>[\s,]+)|(?P<other>.)").expect("valid token pattern"));

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
	Command(char),
	Number(f64),
}

fn tokenize(data: &str) -> Result<Vec<Token>, PathDataError> {
	let mut tokens = Vec::new();
	for captures in TOKEN.captures_iter(data) {
		if let Some(command) = captures.name("command") {
			tokens.extend(command.as_str().chars().next().map(Token::Command));
		} else if let Some(number) = captures.name("number") {
			let value = number.as_str().parse().map_err(|_| PathDataError::UnexpectedToken(number.as_str().to_string()))?;
			tokens.push(Token::Number(value));
		} else if let Some(other) = captures.name("other") {
			return Err(PathDataError::UnexpectedToken(other.as_str().to_string()));
		}
	}
	Ok(tokens)
}

struct Parser {
	tokens: std::iter::Peekable<std::vec::IntoIter<Token>>,
	path: Path,
	current: Vector,
	start: Vector,
	/// Control point to reflect for a following `S` or `T`.
	last_cubic_control: Option<Vector>,
	last_quadratic_control: Option<Vector>,
	/// After a close, the next drawing command starts a new subpath at the old start.
	closed: bool,
}

impl Parser {
	fn numbers<const N: usize>(&mut self, command: char) -> Result<[f64; N], PathDataError> {
		let mut values = [0.; N];
		for value in &mut values {
			match self.tokens.next() {
				Some(Token::Number(number)) => *value = number,
				_ => return Err(PathDataError::MissingCoordinates(command)),
			}
		}
		Ok(values)
	}

	fn point(&self, x: f64, y: f64, relative: bool) -> Vector {
		let point = DVec2::new(x, y);
		if relative { self.current + point } else { point }
	}

	fn draw(&mut self, command: PathCommand) {
		if self.closed {
			self.path.push(PathCommand::MoveTo(self.start));
			self.closed = false;
		}
		if let Some(end) = command.end_point() {
			self.current = end;
		}
		self.path.push(command);
	}

	/// Handles one command with its arguments. Returns the command implied by further bare numbers.
	fn command(&mut self, letter: char) -> Result<Option<char>, PathDataError> {
		let relative = letter.is_ascii_lowercase();
		let mut cubic_control = None;
		let mut quadratic_control = None;

		let repeat = match letter.to_ascii_uppercase() {
			'M' => {
				let [x, y] = self.numbers(letter)?;
				let point = self.point(x, y, relative);
				self.path.push(PathCommand::MoveTo(point));
				self.current = point;
				self.start = point;
				self.closed = false;
				Some(if relative { 'l' } else { 'L' })
			}
			'L' => {
				let [x, y] = self.numbers(letter)?;
				self.draw(PathCommand::LineTo(self.point(x, y, relative)));
				Some(letter)
			}
			'H' => {
				let [x] = self.numbers(letter)?;
				let x = if relative { self.current.x + x } else { x };
				self.draw(PathCommand::LineTo(DVec2::new(x, self.current.y)));
				Some(letter)
			}
			'V' => {
				let [y] = self.numbers(letter)?;
				let y = if relative { self.current.y + y } else { y };
				self.draw(PathCommand::LineTo(DVec2::new(self.current.x, y)));
				Some(letter)
			}
			'C' => {
				let [x1, y1, x2, y2, x, y] = self.numbers(letter)?;
				let (ctrl1, ctrl2, end) = (self.point(x1, y1, relative), self.point(x2, y2, relative), self.point(x, y, relative));
				self.draw(PathCommand::CubicTo(ctrl1, ctrl2, end));
				cubic_control = Some(ctrl2);
				Some(letter)
			}
			'S' => {
				let [x2, y2, x, y] = self.numbers(letter)?;
				let ctrl1 = self.last_cubic_control.map_or(self.current, |control| self.current * 2. - control);
				let (ctrl2, end) = (self.point(x2, y2, relative), self.point(x, y, relative));
				self.draw(PathCommand::CubicTo(ctrl1, ctrl2, end));
				cubic_control = Some(ctrl2);
				Some(letter)
			}
			'Q' => {
				let [x1, y1, x, y] = self.numbers(letter)?;
				let (ctrl, end) = (self.point(x1, y1, relative), self.point(x, y, relative));
				self.draw(PathCommand::QuadTo(ctrl, end));
				quadratic_control = Some(ctrl);
				Some(letter)
			}
			'T' => {
				let [x, y] = self.numbers(letter)?;
				let ctrl = self.last_quadratic_control.map_or(self.current, |control| self.current * 2. - control);
				self.draw(PathCommand::QuadTo(ctrl, self.point(x, y, relative)));
				quadratic_control = Some(ctrl);
				Some(letter)
			}
			'Z' => {
				if !self.closed {
					self.path.push(PathCommand::Close);
				}
				self.current = self.start;
				self.closed = true;
				None
			}
			'A' => {
				let [rx, ry, rotation, large_arc, sweep, x, y] = self.numbers(letter)?;
				let end = self.point(x, y, relative);
				let arc = SvgArc {
					from: Point::new(self.current.x, self.current.y),
					to: Point::new(end.x, end.y),
					radii: Vec2::new(rx, ry),
					x_rotation: rotation.to_radians(),
					large_arc: large_arc != 0.,
					sweep: sweep != 0.,
				};
				match Arc::from_svg_arc(&arc) {
					Some(arc) => {
						let mut cubics = Vec::new();
						arc.to_cubic_beziers(ARC_TOLERANCE, |ctrl1, ctrl2, end| cubics.push([ctrl1, ctrl2, end].map(|point| DVec2::new(point.x, point.y))));
						for [ctrl1, ctrl2, end] in cubics {
							self.draw(PathCommand::CubicTo(ctrl1, ctrl2, end));
						}
					}
					// Zero radii draw a straight line, an arc ending where it starts draws nothing
					None if end != self.current => self.draw(PathCommand::LineTo(end)),
					None => {}
				}
				Some(letter)
			}
			_ => return Err(PathDataError::UnexpectedToken(letter.to_string())),
		};

		self.last_cubic_control = cubic_control;
		self.last_quadratic_control = quadratic_control;
		Ok(repeat)
	}
}

/// Reads SVG path data into absolute commands.
pub fn path_from_path_data(data: &str) -> Result<Path, PathDataError> {
	let mut parser = Parser {
		tokens: tokenize(data)?.into_iter().peekable(),
		path: Path::new(),
		current: DVec2::ZERO,
		start: DVec2::ZERO,
		last_cubic_control: None,
		last_quadratic_control: None,
		closed: false,
	};

	let mut repeat: Option<char> = None;
	while let Some(&token) = parser.tokens.peek() {
		let letter = match token {
			Token::Command(letter) => {
				parser.tokens.next();
				letter
			}
			Token::Number(number) => repeat.ok_or_else(|| if parser.path.is_empty() { PathDataError::MissingMoveTo } else { PathDataError::UnexpectedToken(number.to_string()) })?,
		};
		if parser.path.is_empty() && !matches!(letter, 'M' | 'm') {
			return Err(PathDataError::MissingMoveTo);
		}
		repeat = parser.command(letter)?;
	}
	Ok(parser.path)
}

/// Writes absolute SVG path data.
pub fn path_to_path_data(path: &[PathCommand]) -> String {
	let mut data = String::new();
	for command in path {
		if !data.is_empty() {
			data.push(' ');
		}
		// Writing into a `String` can't fail
		let _ = match *command {
			PathCommand::MoveTo(p) => write!(data, "M {},{}", p.x, p.y),
			PathCommand::LineTo(p) => write!(data, "L {},{}", p.x, p.y),
			PathCommand::QuadTo(c, p) => write!(data, "Q {},{} {},{}", c.x, c.y, p.x, p.y),
			PathCommand::CubicTo(c1, c2, p) => write!(data, "C {},{} {},{} {},{}", c1.x, c1.y, c2.x, c2.y, p.x, p.y),
			PathCommand::Close => write!(data, "Z"),
		};
	}
	data
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn absolute_commands() {
		let path = path_from_path_data("M 10 10 L 50 10 L 30 40 Z").unwrap();
		assert_eq!(
			path,
			vec![
				PathCommand::MoveTo(DVec2::new(10., 10.)),
				PathCommand::LineTo(DVec2::new(50., 10.)),
				PathCommand::LineTo(DVec2::new(30., 40.)),
				PathCommand::Close,
			]
		);
	}

	#[test]
	fn relative_and_implicit_commands() {
		let path = path_from_path_data("m1,1 2,0 0,2h-1v-1z").unwrap();
		assert_eq!(
			path,
			vec![
				PathCommand::MoveTo(DVec2::new(1., 1.)),
				PathCommand::LineTo(DVec2::new(3., 1.)),
				PathCommand::LineTo(DVec2::new(3., 3.)),
				PathCommand::LineTo(DVec2::new(2., 3.)),
				PathCommand::LineTo(DVec2::new(2., 2.)),
				PathCommand::Close,
			]
		);
	}

	#[test]
	fn smooth_curves_reflect_their_control_points() {
		let path = path_from_path_data("M0 0 C0 1 1 1 1 0 S2 -1 2 0 Q3 1 4 0 T6 0").unwrap();
		assert_eq!(path[2], PathCommand::CubicTo(DVec2::new(1., -1.), DVec2::new(2., -1.), DVec2::new(2., 0.)));
		assert_eq!(path[4], PathCommand::QuadTo(DVec2::new(5., -1.), DVec2::new(6., 0.)));
	}

	#[test]
	fn drawing_after_close_restarts_at_the_subpath_start() {
		let path = path_from_path_data("M0 0 L1 0 L1 1 Z l0 1 L0 1 z").unwrap();
		assert_eq!(path[4], PathCommand::MoveTo(DVec2::new(0., 0.)));
		assert_eq!(path[5], PathCommand::LineTo(DVec2::new(0., 1.)));
	}

	#[test]
	fn numbers_without_separators() {
		let path = path_from_path_data("M.5.5L-1e1-2.").unwrap();
		assert_eq!(path, vec![PathCommand::MoveTo(DVec2::new(0.5, 0.5)), PathCommand::LineTo(DVec2::new(-10., -2.))]);
	}

	#[test]
	fn malformed_data() {
		assert_eq!(path_from_path_data("L 1 1"), Err(PathDataError::MissingMoveTo));
		assert_eq!(path_from_path_data("1 1"), Err(PathDataError::MissingMoveTo));
		assert_eq!(path_from_path_data("M 1"), Err(PathDataError::MissingCoordinates('M')));
		assert_eq!(path_from_path_data("M 0 0 A 1 1 0 0 1"), Err(PathDataError::MissingCoordinates('A')));
		assert_eq!(path_from_path_data("M 0 0 X"), Err(PathDataError::UnexpectedToken("X".to_string())));
		assert_eq!(path_from_path_data("M 0 0 ; 1"), Err(PathDataError::UnexpectedToken(";".to_string())));
		assert_eq!(path_from_path_data(""), Ok(Path::new()));
	}

	#[test]
	fn arcs_become_cubics() {
		// Half of a circle of radius 1 around (1, 0), above the x axis
		let path = path_from_path_data("M 0 0 A 1 1 0 0 0 2 0 Z").unwrap();
		assert!(path.len() > 2);
		assert!(path[1..path.len() - 1].iter().all(|command| matches!(command, PathCommand::CubicTo(..))));
		let end = path[path.len() - 2].end_point().unwrap();
		assert!(end.abs_diff_eq(DVec2::new(2., 0.), 1e-9));
		let area = kurbo::Shape::area(&crate::path::path_to_bez_path(&path));
		assert!((area.abs() - std::f64::consts::FRAC_PI_2).abs() < 1e-3, "{area}");

		let relative = path_from_path_data("m 1 1 a 1 1 0 1 1 0 2").unwrap();
		assert!(relative.last().unwrap().end_point().unwrap().abs_diff_eq(DVec2::new(1., 3.), 1e-9));

		assert_eq!(path_from_path_data("M 0 0 A 0 0 0 0 1 2 2").unwrap()[1], PathCommand::LineTo(DVec2::new(2., 2.)));
		assert_eq!(path_from_path_data("M 1 1 A 1 1 0 0 1 1 1").unwrap(), vec![PathCommand::MoveTo(DVec2::new(1., 1.))]);
	}

	#[test]
	fn printed_data_reads_back() {
		let data = "M 0,0 C 0,1 1,1 1,0 Q 2,-1 3,0 L 3,3 Z";
		let path = path_from_path_data(data).unwrap();
		assert_eq!(path_to_path_data(&path), data);
	}
}
