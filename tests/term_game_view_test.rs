use blockfall::core::{Board, GameConfig, GameState};
use blockfall::term::{piece_color, AnchorY, FrameBuffer, GameView, Viewport, WELL_BG};
use blockfall::types::{GameAction, PieceKind, BOARD_HEIGHT};

fn screen_text(fb: &FrameBuffer) -> String {
    let mut all = String::new();
    for y in 0..fb.height() {
        all.push_str(&fb.row_text(y));
        all.push('\n');
    }
    all
}

fn playing() -> GameState {
    let mut gs = GameState::new(GameConfig::default().with_seed(1));
    gs.apply_action(GameAction::Start);
    gs
}

#[test]
fn term_view_centers_board_by_default_on_tall_viewports() {
    let snap = GameState::default().snapshot();
    let view = GameView::default();

    // Board frame is 22 columns (10 cells x 2 + border) by 22 rows.
    let fb = view.render(&snap, Viewport::new(22, 30));

    // start_y = (30 - 22) / 2 = 4 => top-left corner at (0,4).
    assert_eq!(fb.get(0, 4).unwrap().ch, '┌');
    assert_eq!(fb.get(21, 25).unwrap().ch, '┘');
}

#[test]
fn term_view_can_anchor_board_to_top() {
    let snap = GameState::default().snapshot();
    let view = GameView::default().with_anchor_y(AnchorY::Top);

    let fb = view.render(&snap, Viewport::new(22, 30));
    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
}

#[test]
fn term_view_draws_side_panel_when_wide_enough() {
    let mut snap = playing().snapshot();
    snap.score = 1234;
    snap.best_score = 5678;
    snap.level = 2;
    snap.lines = 10;

    let fb = GameView::default().render(&snap, Viewport::new(60, 24));
    let text = screen_text(&fb);
    for needle in ["SCORE", "1234", "BEST", "5678", "LEVEL", "LINES", "NEXT"] {
        assert!(text.contains(needle), "missing {needle}");
    }
}

#[test]
fn term_view_skips_side_panel_on_narrow_viewports() {
    let fb = GameView::default().render(&playing().snapshot(), Viewport::new(24, 24));
    assert!(!screen_text(&fb).contains("SCORE"));
}

#[test]
fn term_view_shows_active_and_locked_pieces() {
    let mut gs = playing();
    *gs.board_mut() = Board::from_rows(&["J........."]);
    gs.force_spawn(PieceKind::O);
    let snap = gs.snapshot();

    let view = GameView::default();
    let vp = Viewport::new(80, 24);
    let fb = view.render(&snap, vp);

    let (x, y) = view.cell_origin(vp, 0, BOARD_HEIGHT as u16 - 1);
    assert_eq!(fb.get(x, y).unwrap().style.fg, piece_color(PieceKind::J));

    // O spawns at columns 4-5, rows 0-1.
    let (x, y) = view.cell_origin(vp, 4, 0);
    let cell = fb.get(x, y).unwrap();
    assert_eq!(cell.ch, '█');
    assert_eq!(cell.style.fg, piece_color(PieceKind::O));

    // Ghost sits on the floor under it.
    let (x, y) = view.cell_origin(vp, 5, 19);
    assert_eq!(fb.get(x, y).unwrap().ch, '░');
}

#[test]
fn term_view_blinks_clearing_rows_and_hides_active() {
    let mut gs = playing();
    *gs.board_mut() = Board::from_rows(&["####..####"]);
    gs.force_spawn(PieceKind::O);
    gs.hard_drop();

    let view = GameView::default();
    let vp = Viewport::new(80, 24);
    let (x, y) = view.cell_origin(vp, 0, 19);

    // Progress 0: fully visible.
    let fb = view.render(&gs.snapshot(), vp);
    assert_eq!(fb.get(x, y).unwrap().style.fg, piece_color(PieceKind::I));

    // Progress 1/3: the cosine blink is at its first trough.
    gs.tick(100);
    let fb = view.render(&gs.snapshot(), vp);
    assert_eq!(fb.get(x, y).unwrap().style.fg, WELL_BG);

    // No falling piece is drawn during the clear.
    let text = screen_text(&fb);
    assert!(!text.contains('░'));
}

#[test]
fn term_view_overlays_follow_phase() {
    let view = GameView::default();
    let vp = Viewport::new(80, 24);

    let mut gs = GameState::default();
    assert!(screen_text(&view.render(&gs.snapshot(), vp)).contains("PRESS SPACE"));

    gs.apply_action(GameAction::Start);
    let text = screen_text(&view.render(&gs.snapshot(), vp));
    assert!(!text.contains("PRESS SPACE"));
    assert!(!text.contains("GAME OVER"));

    *gs.board_mut() = Board::from_rows(&["....##...."; 18]);
    gs.force_spawn(PieceKind::O);
    gs.hard_drop();
    assert!(screen_text(&view.render(&gs.snapshot(), vp)).contains("GAME OVER"));
}

#[test]
fn term_view_reuses_framebuffer_across_resizes() {
    let view = GameView::default();
    let snap = playing().snapshot();
    let mut fb = FrameBuffer::new(0, 0);

    view.render_into(&snap, Viewport::new(80, 24), &mut fb);
    assert_eq!((fb.width(), fb.height()), (80, 24));
    view.render_into(&snap, Viewport::new(40, 30), &mut fb);
    assert_eq!((fb.width(), fb.height()), (40, 30));
}
