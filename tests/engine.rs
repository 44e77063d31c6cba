use life_tiles::{
    proc::{ Board, Cell },
    sched::{ Scheduler, TileGrid },
};
use rand::{ rngs::StdRng, Rng, SeedableRng };

const SEED: u64 = 42;

fn random_board(size: usize, rng: &mut StdRng) -> Board {
    let mut board = Board::new(size);
    for i in 0..size {
        for j in 0..size {
            if rng.gen_bool(0.35) {
                board.set(i, j, Cell::Alive);
            }
        }
    }
    board
}

/// Straightforward single-threaded step used as the reference.
fn naive_step(board: &Board) -> Board {
    let size = board.size() as i64;
    let mut next = Board::new(board.size());
    for i in 0..size {
        for j in 0..size {
            let mut n = 0;
            for di in -1..=1 {
                for dj in -1..=1 {
                    let (r, c) = (i + di, j + dj);
                    if (di, dj) != (0, 0)
                        && (0..size).contains(&r)
                        && (0..size).contains(&c)
                        && board.get(r as usize, c as usize).is_alive()
                    {
                        n += 1;
                    }
                }
            }
            let alive = board.get(i as usize, j as usize).is_alive();
            if (alive && (n == 2 || n == 3)) || (!alive && n == 3) {
                next.set(i as usize, j as usize, Cell::Alive);
            }
        }
    }
    next
}

#[test]
fn tiled_matches_sequential() {
    let mut rng = StdRng::seed_from_u64(SEED);
    for size in [1, 6, 12, 30] {
        for per_axis in (1..=size).filter(|n| size % n == 0) {
            let scheduler = Scheduler::new(TileGrid::new(size, per_axis).unwrap());
            let mut current = random_board(size, &mut rng);
            let mut next = Board::new(size);

            for generation in 0..8 {
                let expected = naive_step(&current);
                scheduler.advance(&current, &mut next).unwrap();
                assert_eq!(next, expected, "{size}x{size}, {per_axis} tiles per axis, generation {generation}");
                std::mem::swap(&mut current, &mut next);
            }
        }
    }
}

#[test]
fn glider_crosses_tile_borders() {
    let glider = "\
        .#......\n\
        ..#.....\n\
        ###.....\n\
        ........\n\
        ........\n\
        ........\n\
        ........\n\
        ........\n";
    let mut current: Board = glider.parse().unwrap();
    let mut next = Board::new(8);
    let scheduler = Scheduler::new(TileGrid::new(8, 4).unwrap());

    for _ in 0..4 {
        scheduler.advance(&current, &mut next).unwrap();
        std::mem::swap(&mut current, &mut next);
    }

    // a glider moves one cell down and right every four generations
    let moved = "\
        ........\n\
        ..#.....\n\
        ...#....\n\
        .###....\n\
        ........\n\
        ........\n\
        ........\n\
        ........\n";
    assert_eq!(current.to_string(), moved);
}
