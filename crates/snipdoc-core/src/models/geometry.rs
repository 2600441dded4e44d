//! 좌표/사각형 연산.
//!
//! 선택 영역 바운딩 박스는 뷰포트 기준 CSS 픽셀(`f64`),
//! 크롭 영역은 서피스 기준 디바이스 픽셀(`u32`)로 구분한다.
//! 좌표 공간 변환은 항상 [`relative_to`]를 통해 명시적으로 수행한다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// 2D 좌표 (뷰포트 기준 또는 페이지 기준)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// `origin` 기준 상대 좌표로 변환
///
/// 실패하지 않는 순수 함수. `o`, `p`, 차이값이 모두 `f64`로 정확히 표현되는
/// 경우(CSS 픽셀 격자 위의 값)에만 `relative_to(o, p) + o == p`가 비트 단위로
/// 성립한다. 크기 차이가 큰 값(예: `o = 1e16`, `p = 1.0`)은 반올림 오차가 남는다.
pub fn relative_to(origin: Point, point: Point) -> Point {
    point - origin
}

/// 뷰포트 기준 사각형 (CSS 픽셀)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// 좌상단 모서리
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// 상단 변의 수평 중점 (오버레이 앵커)
    pub fn top_center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top)
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// 디바이스 픽셀 영역으로 반올림 (배율 1)
    ///
    /// 음수와 NaN은 0, `u32` 범위를 넘는 값은 `u32::MAX`로 고정된다.
    pub fn to_pixels(&self) -> PixelRect {
        let px = |v: f64| v.max(0.0).round() as u32;
        PixelRect::new(px(self.left), px(self.top), px(self.width), px(self.height))
    }
}

/// 서피스 기준 크롭 영역 (디바이스 픽셀)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// 오른쪽 경계 (오버플로우 시 None)
    pub fn right(&self) -> Option<u32> {
        self.left.checked_add(self.width)
    }

    /// 아래쪽 경계 (오버플로우 시 None)
    pub fn bottom(&self) -> Option<u32> {
        self.top.checked_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// `width x height` 서피스 안에 완전히 들어가는지 확인
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        matches!(self.right(), Some(r) if r <= width)
            && matches!(self.bottom(), Some(b) if b <= height)
    }
}

impl fmt::Display for PixelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{} {}x{}",
            self.left, self.top, self.width, self.height
        )
    }
}

impl FromStr for PixelRect {
    type Err = String;

    /// `"L,T,W,H"` 형식 파싱 (CLI 인자용)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("영역 파싱 실패 '{s}': {e}"))?;

        match parts.as_slice() {
            [left, top, width, height] => Ok(PixelRect::new(*left, *top, *width, *height)),
            _ => Err(format!("영역은 L,T,W,H 형식이어야 함: '{s}'")),
        }
    }
}
