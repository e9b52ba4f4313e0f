//! GameView: maps a `GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{get_shape, GameSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Phase, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

/// Well background; clearing rows fade toward it.
pub const WELL_BG: Rgb = Rgb::new(0, 0, 17);

const BLOCK: char = '█';

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Display color of a piece kind.
pub fn piece_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(0, 255, 255),
        PieceKind::O => Rgb::new(255, 255, 0),
        PieceKind::T => Rgb::new(170, 0, 255),
        PieceKind::S => Rgb::new(0, 255, 102),
        PieceKind::Z => Rgb::new(255, 51, 51),
        PieceKind::J => Rgb::new(51, 102, 255),
        PieceKind::L => Rgb::new(255, 136, 0),
    }
}

/// A lightweight terminal renderer for the game.
#[derive(Debug, Clone, Copy)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    fn frame_size(&self) -> (u16, u16) {
        (
            (BOARD_WIDTH as u16) * self.cell_w + 2,
            (BOARD_HEIGHT as u16) * self.cell_h + 2,
        )
    }

    /// Top-left corner of the board frame inside `viewport`.
    pub fn frame_origin(&self, viewport: Viewport) -> (u16, u16) {
        let (frame_w, frame_h) = self.frame_size();
        let x = viewport.width.saturating_sub(frame_w) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };
        (x, y)
    }

    /// Terminal position of the top-left character of board cell (x, y).
    pub fn cell_origin(&self, viewport: Viewport, x: u16, y: u16) -> (u16, u16) {
        let (start_x, start_y) = self.frame_origin(viewport);
        (
            start_x + 1 + x * self.cell_w,
            start_y + 1 + y * self.cell_h,
        )
    }

    /// Render a snapshot into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames; it is only resized when
    /// the viewport changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let (frame_w, frame_h) = self.frame_size();
        let (start_x, start_y) = self.frame_origin(viewport);

        let border = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        fb.fill_rect(
            start_x + 1,
            start_y + 1,
            frame_w - 2,
            frame_h - 2,
            ' ',
            CellStyle::new(WELL_BG, WELL_BG),
        );
        self.draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        // Locked cells; rows waiting to be cleared blink out.
        let alpha = snap.clear_alpha();
        for y in 0..BOARD_HEIGHT as u16 {
            let clearing = snap.is_clearing_row(y as usize);
            for x in 0..BOARD_WIDTH as u16 {
                match PieceKind::from_code(snap.board[y as usize][x as usize]) {
                    Some(kind) if clearing => {
                        let fg = piece_color(kind).blend_over(WELL_BG, alpha);
                        self.fill_cell(fb, viewport, x, y, BLOCK, CellStyle::new(fg, WELL_BG));
                    }
                    Some(kind) => {
                        let style = CellStyle::new(piece_color(kind), WELL_BG).bold();
                        self.fill_cell(fb, viewport, x, y, BLOCK, style);
                    }
                    None => {
                        let dot = CellStyle::new(Rgb::new(40, 40, 70), WELL_BG).dim();
                        self.fill_cell(fb, viewport, x, y, '·', dot);
                    }
                }
            }
        }

        if let Some(active) = snap.active {
            if let Some(ghost_y) = snap.ghost_y.filter(|&g| g != active.y) {
                let ghost = CellStyle::new(piece_color(active.kind), WELL_BG).dim();
                for (dx, dy) in active.shape.minos() {
                    self.fill_board_cell(fb, viewport, active.x + dx, ghost_y + dy, '░', ghost);
                }
            }

            let style = CellStyle::new(piece_color(active.kind), WELL_BG).bold();
            for (dx, dy) in active.shape.minos() {
                self.fill_board_cell(fb, viewport, active.x + dx, active.y + dy, BLOCK, style);
            }
        }

        self.draw_side_panel(fb, snap, viewport, start_x, start_y, frame_w);

        match snap.phase {
            Phase::Start => {
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, 0, "PRESS SPACE");
            }
            Phase::Over => {
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, 0, "GAME OVER");
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, 2, "SPACE: AGAIN");
            }
            Phase::Playing | Phase::Clearing => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    /// Like `fill_cell`, but skips cells outside the board (spawn overhang).
    fn fill_board_cell(
        &self,
        fb: &mut FrameBuffer,
        viewport: Viewport,
        x: i8,
        y: i8,
        ch: char,
        style: CellStyle,
    ) {
        if x >= 0 && x < BOARD_WIDTH as i8 && y >= 0 && y < BOARD_HEIGHT as i8 {
            self.fill_cell(fb, viewport, x as u16, y as u16, ch, style);
        }
    }

    fn fill_cell(
        &self,
        fb: &mut FrameBuffer,
        viewport: Viewport,
        x: u16,
        y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let (px, py) = self.cell_origin(viewport, x, y);
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

        let mut y = start_y;
        for (name, n) in [
            ("SCORE", snap.score),
            ("BEST", snap.best_score),
            ("LEVEL", snap.level),
            ("LINES", snap.lines),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y.saturating_add(1), n, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        if let Some(kind) = snap.next {
            self.draw_preview(fb, panel_x, y, kind);
        }
    }

    /// Next piece drawn from its spawn matrix, one character row per shape row.
    fn draw_preview(&self, fb: &mut FrameBuffer, x: u16, y: u16, kind: PieceKind) {
        let style = CellStyle::new(piece_color(kind), Rgb::new(0, 0, 0)).bold();
        for (dx, dy) in get_shape(kind, Rotation::North).minos() {
            let px = x + (dx as u16) * self.cell_w;
            let py = y + dy as u16;
            fb.fill_rect(px, py, self.cell_w, 1, BLOCK, style);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        line: u16,
        text: &str,
    ) {
        let mid_y = start_y.saturating_add(frame_h / 2).saturating_add(line);
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
        fb.put_str(x, mid_y, text, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(fb: &FrameBuffer, text: &str) -> bool {
        (0..fb.height()).any(|y| fb.row_text(y).contains(text))
    }

    #[test]
    fn start_screen_shows_prompt() {
        let fb = GameView::default().render(&GameSnapshot::default(), Viewport::new(80, 24));
        assert!(find(&fb, "PRESS SPACE"));
        assert!(!find(&fb, "GAME OVER"));
        assert!(find(&fb, "SCORE"));
    }

    #[test]
    fn over_screen_shows_game_over() {
        let snap = GameSnapshot {
            phase: Phase::Over,
            ..GameSnapshot::default()
        };
        let fb = GameView::default().render(&snap, Viewport::new(80, 24));
        assert!(find(&fb, "GAME OVER"));
    }

    #[test]
    fn locked_cell_uses_piece_color() {
        let view = GameView::default();
        let vp = Viewport::new(80, 24);
        let mut snap = GameSnapshot::default();
        snap.phase = Phase::Playing;
        snap.board[19][0] = PieceKind::L.code();

        let fb = view.render(&snap, vp);
        let (px, py) = view.cell_origin(vp, 0, 19);
        let cell = fb.get(px, py).unwrap();
        assert_eq!(cell.ch, BLOCK);
        assert_eq!(cell.style.fg, piece_color(PieceKind::L));
        assert_eq!(fb.get(px + 1, py).unwrap().ch, BLOCK);
    }

    #[test]
    fn clearing_row_fades_toward_background() {
        let view = GameView::default();
        let vp = Viewport::new(80, 24);
        let mut snap = GameSnapshot::default();
        snap.phase = Phase::Clearing;
        snap.board[19] = [PieceKind::I.code(); BOARD_WIDTH as usize];
        snap.clearing_rows[19] = true;
        snap.clear_progress = 1.0;

        let fb = view.render(&snap, vp);
        let (px, py) = view.cell_origin(vp, 3, 19);
        assert_eq!(fb.get(px, py).unwrap().style.fg, WELL_BG);

        snap.clear_progress = 0.0;
        let fb = view.render(&snap, vp);
        assert_eq!(
            fb.get(px, py).unwrap().style.fg,
            piece_color(PieceKind::I)
        );
    }

    #[test]
    fn small_viewport_does_not_panic() {
        let fb = GameView::default().render(&GameSnapshot::default(), Viewport::new(5, 3));
        assert_eq!(fb.width(), 5);
    }
}
