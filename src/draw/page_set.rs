//! Ordered page collection with a current-page pointer.

use super::color::Color;
use super::page::Page;
use super::raster::RasterError;

/// Ordered, never-empty list of pages.
///
/// Pages live for the whole session; there is no page removal.
#[derive(Debug)]
pub struct PageSet {
    pages: Vec<Page>,
    current: usize,
    width: i32,
    height: i32,
}

impl PageSet {
    /// Creates a set holding one page of the given size and background.
    pub fn new(width: i32, height: i32, background: Color) -> Result<Self, RasterError> {
        Ok(Self {
            pages: vec![Page::new(width, height, background)?],
            current: 0,
            width,
            height,
        })
    }

    pub fn current(&self) -> &Page {
        &self.pages[self.current]
    }

    pub fn current_mut(&mut self) -> &mut Page {
        &mut self.pages[self.current]
    }

    /// Zero-based index of the current page.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Appends a page filled with `background` and makes it current.
    pub fn add_page(&mut self, background: Color) -> Result<usize, RasterError> {
        let page = Page::new(self.width, self.height, background)?;
        self.pages.push(page);
        self.current = self.pages.len() - 1;
        Ok(self.current)
    }

    /// Moves to the next page; returns false at the last page.
    pub fn next(&mut self) -> bool {
        if self.current + 1 < self.pages.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Moves to the previous page; returns false at the first page.
    pub fn prev(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLACK, WHITE};

    #[test]
    fn add_page_switches_to_it() {
        let mut pages = PageSet::new(16, 16, BLACK).unwrap();
        assert_eq!(pages.add_page(WHITE).unwrap(), 1);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages.current_index(), 1);
        assert_eq!(pages.current().background(), WHITE);
        assert!(pages.prev());
        assert_eq!(pages.current().background(), BLACK);
    }

    #[test]
    fn navigation_stops_at_both_ends() {
        let mut pages = PageSet::new(16, 16, BLACK).unwrap();
        assert!(!pages.prev());
        assert!(!pages.next());

        pages.add_page(BLACK).unwrap();
        assert!(!pages.next());
        assert!(pages.prev());
        assert_eq!(pages.current_index(), 0);
        assert!(!pages.prev());
    }
}
