//! Pieces tests - shapes, spawn positions and the wall-kick rotation system

use blockfall::core::pieces::{
    base_shape, get_kick_table, get_shape, kick_index, try_rotate, Piece,
};
use blockfall::core::{Board, Shape};
use blockfall::types::{PieceKind, Rotation};

fn minos(kind: PieceKind, rotation: Rotation) -> Vec<(i8, i8)> {
    get_shape(kind, rotation).minos().to_vec()
}

// ============== Shape Tests ==============

#[test]
fn test_i_piece_shapes() {
    assert_eq!(minos(PieceKind::I, Rotation::North), [(0, 1), (1, 1), (2, 1), (3, 1)]);
    assert_eq!(minos(PieceKind::I, Rotation::East), [(2, 0), (2, 1), (2, 2), (2, 3)]);
    assert_eq!(minos(PieceKind::I, Rotation::South), [(0, 2), (1, 2), (2, 2), (3, 2)]);
    assert_eq!(minos(PieceKind::I, Rotation::West), [(1, 0), (1, 1), (1, 2), (1, 3)]);
}

#[test]
fn test_o_piece_never_changes() {
    let north = minos(PieceKind::O, Rotation::North);
    assert_eq!(north, [(0, 0), (1, 0), (0, 1), (1, 1)]);
    for rotation in [Rotation::East, Rotation::South, Rotation::West] {
        assert_eq!(minos(PieceKind::O, rotation), north);
    }
}

#[test]
fn test_t_piece_shapes() {
    assert_eq!(minos(PieceKind::T, Rotation::North), [(1, 0), (0, 1), (1, 1), (2, 1)]);
    assert_eq!(minos(PieceKind::T, Rotation::East), [(1, 0), (1, 1), (2, 1), (1, 2)]);
    assert_eq!(minos(PieceKind::T, Rotation::South), [(0, 1), (1, 1), (2, 1), (1, 2)]);
    assert_eq!(minos(PieceKind::T, Rotation::West), [(1, 0), (0, 1), (1, 1), (1, 2)]);
}

#[test]
fn test_s_z_j_l_spawn_shapes() {
    assert_eq!(minos(PieceKind::S, Rotation::North), [(1, 0), (2, 0), (0, 1), (1, 1)]);
    assert_eq!(minos(PieceKind::S, Rotation::East), [(1, 0), (1, 1), (2, 1), (2, 2)]);
    assert_eq!(minos(PieceKind::Z, Rotation::North), [(0, 0), (1, 0), (1, 1), (2, 1)]);
    assert_eq!(minos(PieceKind::J, Rotation::North), [(0, 0), (0, 1), (1, 1), (2, 1)]);
    assert_eq!(minos(PieceKind::L, Rotation::North), [(2, 0), (0, 1), (1, 1), (2, 1)]);
}

#[test]
fn test_every_shape_has_four_cells() {
    for kind in PieceKind::ALL {
        for rotation in [Rotation::North, Rotation::East, Rotation::South, Rotation::West] {
            assert_eq!(get_shape(kind, rotation).minos().len(), 4, "{kind:?} {rotation:?}");
        }
    }
}

#[test]
fn test_ccw_is_three_cw() {
    for kind in PieceKind::ALL {
        let base = base_shape(kind);
        let three_cw = base.rotated_cw().rotated_cw().rotated_cw();
        assert_eq!(base.rotated_ccw(), three_cw, "{kind:?}");
        assert_eq!(base.rotated_cw().rotated_ccw(), base, "{kind:?}");
    }
}

#[test]
fn test_spawn_positions() {
    assert_eq!(Piece::spawn(PieceKind::I).x, 3);
    assert_eq!(Piece::spawn(PieceKind::O).x, 4);
    for kind in [PieceKind::T, PieceKind::S, PieceKind::Z, PieceKind::J, PieceKind::L] {
        let piece = Piece::spawn(kind);
        assert_eq!(piece.x, 3, "{kind:?}");
        assert_eq!(piece.y, 0);
        assert_eq!(piece.rotation, Rotation::North);
    }
}

// ============== Kick tables ==============

fn kicks(kind: PieceKind, from: Rotation, to: Rotation) -> [(i8, i8); 5] {
    let table = get_kick_table(kind).expect("kind has kicks");
    table[kick_index(from, to).expect("adjacent states")]
}

#[test]
fn test_jlstz_kick_table_values() {
    use Rotation::*;
    let k = PieceKind::T;
    assert_eq!(kicks(k, North, East), [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)]);
    assert_eq!(kicks(k, East, North), [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)]);
    assert_eq!(kicks(k, East, South), [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)]);
    assert_eq!(kicks(k, South, East), [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)]);
    assert_eq!(kicks(k, South, West), [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)]);
    assert_eq!(kicks(k, West, South), [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)]);
    assert_eq!(kicks(k, West, North), [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)]);
    assert_eq!(kicks(k, North, West), [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)]);
}

#[test]
fn test_i_kick_table_values() {
    use Rotation::*;
    let k = PieceKind::I;
    assert_eq!(kicks(k, North, East), [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)]);
    assert_eq!(kicks(k, East, North), [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)]);
    assert_eq!(kicks(k, East, South), [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)]);
    assert_eq!(kicks(k, South, East), [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)]);
    assert_eq!(kicks(k, South, West), [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)]);
    assert_eq!(kicks(k, West, South), [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)]);
    assert_eq!(kicks(k, West, North), [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)]);
    assert_eq!(kicks(k, North, West), [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)]);
}

#[test]
fn test_kick_families() {
    assert!(get_kick_table(PieceKind::O).is_none());
    for kind in [PieceKind::J, PieceKind::L, PieceKind::S, PieceKind::Z] {
        assert_eq!(get_kick_table(kind), get_kick_table(PieceKind::T));
    }
    assert_ne!(get_kick_table(PieceKind::I), get_kick_table(PieceKind::T));
    assert_eq!(kick_index(Rotation::North, Rotation::South), None);
}

// ============== Rotation with kicks ==============

fn on(board: &Board) -> impl Fn(&Shape, i8, i8) -> bool + '_ {
    move |shape: &Shape, x: i8, y: i8| board.is_legal(shape, x, y)
}

#[test]
fn test_rotation_in_open_space_keeps_anchor() {
    let board = Board::new();
    let piece = Piece {
        x: 4,
        y: 10,
        ..Piece::spawn(PieceKind::T)
    };
    let (rotated, kick) = try_rotate(&piece, true, on(&board)).unwrap();
    assert_eq!(kick, (0, 0));
    assert_eq!((rotated.x, rotated.y), (4, 10));
    assert_eq!(rotated.rotation, Rotation::East);
    assert_eq!(rotated.shape, get_shape(PieceKind::T, Rotation::East));
}

#[test]
fn test_o_rotation_is_rejected() {
    let board = Board::new();
    let piece = Piece::spawn(PieceKind::O);
    assert!(try_rotate(&piece, true, on(&board)).is_none());
    assert!(try_rotate(&piece, false, on(&board)).is_none());
}

#[test]
fn test_all_kicks_failing_leaves_piece_unchanged() {
    let piece = Piece {
        y: 8,
        ..Piece::spawn(PieceKind::L)
    };
    let before = piece;
    assert!(try_rotate(&piece, true, |_, _, _| false).is_none());
    assert_eq!(piece, before);
}

#[test]
fn test_positive_kick_dy_moves_piece_up() {
    let piece = Piece {
        x: 4,
        y: 10,
        ..Piece::spawn(PieceKind::T)
    };

    // North -> East offsets: (0,0), (-1,0), (-1,1), (0,-2), (-1,-2).
    let (rotated, kick) = try_rotate(&piece, true, |_, x, y| (x, y) == (3, 9)).unwrap();
    assert_eq!(kick, (-1, 1));
    assert_eq!((rotated.x, rotated.y), (3, 9));

    let (rotated, kick) = try_rotate(&piece, true, |_, x, y| (x, y) == (4, 12)).unwrap();
    assert_eq!(kick, (0, -2));
    assert_eq!((rotated.x, rotated.y), (4, 12));
}

#[test]
fn test_kicks_are_tried_in_order() {
    let piece = Piece {
        x: 4,
        y: 10,
        ..Piece::spawn(PieceKind::J)
    };
    let tried = std::cell::RefCell::new(Vec::new());
    let result = try_rotate(&piece, false, |_, x, y| {
        tried.borrow_mut().push((x, y));
        false
    });
    assert!(result.is_none());
    // North -> West offsets (0,0), (1,0), (1,1), (0,-2), (1,-2) with y inverted.
    assert_eq!(
        tried.into_inner(),
        vec![(4, 10), (5, 10), (5, 9), (4, 12), (5, 12)]
    );
}

#[test]
fn test_i_wall_kick_off_right_wall() {
    let board = Board::new();
    // Vertical I hugging the right wall (matrix column 2 = board column 9).
    let piece = Piece {
        kind: PieceKind::I,
        shape: get_shape(PieceKind::I, Rotation::East),
        rotation: Rotation::East,
        x: 7,
        y: 5,
    };
    assert!(board.is_legal(&piece.shape, piece.x, piece.y));

    let (rotated, kick) = try_rotate(&piece, true, on(&board)).unwrap();
    assert_eq!(rotated.rotation, Rotation::South);
    assert_eq!(kick, (-1, 0));
    assert_eq!((rotated.x, rotated.y), (6, 5));
    assert!(board.is_legal(&rotated.shape, rotated.x, rotated.y));
}

#[test]
fn test_t_floor_kick_lifts_piece() {
    let board = Board::new();
    // Flat T resting on the floor: its East shape would poke through it.
    let piece = Piece {
        x: 4,
        y: 18,
        ..Piece::spawn(PieceKind::T)
    };
    let (rotated, kick) = try_rotate(&piece, true, on(&board)).unwrap();
    assert_eq!(kick, (-1, 1));
    assert_eq!((rotated.x, rotated.y), (3, 17));
}

#[test]
fn test_i_wall_kick_off_left_wall() {
    let board = Board::new();
    // Vertical I in West orientation hugging the left wall (matrix column 1).
    let piece = Piece {
        kind: PieceKind::I,
        shape: get_shape(PieceKind::I, Rotation::West),
        rotation: Rotation::West,
        x: -1,
        y: 5,
    };
    assert!(board.is_legal(&piece.shape, piece.x, piece.y));

    // West -> North offsets: (0,0), (1,0), (-2,0), (1,-2), (-2,1).
    let (rotated, kick) = try_rotate(&piece, true, on(&board)).unwrap();
    assert_eq!(rotated.rotation, Rotation::North);
    assert_eq!(kick, (1, 0));
    assert_eq!((rotated.x, rotated.y), (0, 5));
}
