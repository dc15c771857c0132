/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use arbiter::{perft, Color, GameState};

fn test_perft_diagram_nodes(depth: usize, rows: &[&str], side_to_move: Color, expected: u64) {
    let diagram = rows.join("\n");
    let state = GameState::from_diagram(&diagram, side_to_move).unwrap();
    let res = perft(&state, depth);
    assert_eq!(res, expected, "PERFT({depth}) failed on\n{diagram}");
}

#[cfg(test)]
mod startpos_perft {
    use arbiter::{perft, GameState};

    #[test]
    fn test_startpos_perft_1() {
        assert_eq!(perft(&GameState::new(), 1), 20);
    }
    #[test]
    fn test_startpos_perft_2() {
        assert_eq!(perft(&GameState::new(), 2), 400);
    }
    #[test]
    fn test_startpos_perft_3() {
        assert_eq!(perft(&GameState::new(), 3), 8902);
    }
    #[test]
    fn test_startpos_perft_4() {
        assert_eq!(perft(&GameState::new(), 4), 197281);
    }
}

#[cfg(test)]
mod kiwipete_perft {
    use crate::test_perft_diagram_nodes;
    use arbiter::Color;

    const KIWIPETE: [&str; 8] = [
        "r...k..r", "p.ppqpb.", "bn..pnp.", "...PN...", ".p..P...", "..N..Q.p", "PPPBBPPP",
        "R...K..R",
    ];

    #[test]
    fn test_kiwipete_perft_1() {
        test_perft_diagram_nodes(1, &KIWIPETE, Color::White, 48);
    }
    #[test]
    fn test_kiwipete_perft_2() {
        test_perft_diagram_nodes(2, &KIWIPETE, Color::White, 2039);
    }
    #[test]
    fn test_kiwipete_perft_3() {
        test_perft_diagram_nodes(3, &KIWIPETE, Color::White, 97862);
    }
}

#[cfg(test)]
mod endgame_perft {
    use crate::test_perft_diagram_nodes;
    use arbiter::Color;

    const ENDGAME: [&str; 8] = [
        "........", "..p.....", "...p....", "KP.....r", ".R...p.k", "........", "....P.P.",
        "........",
    ];

    #[test]
    fn test_endgame_perft_1() {
        test_perft_diagram_nodes(1, &ENDGAME, Color::White, 14);
    }
    #[test]
    fn test_endgame_perft_2() {
        test_perft_diagram_nodes(2, &ENDGAME, Color::White, 191);
    }
    #[test]
    fn test_endgame_perft_3() {
        test_perft_diagram_nodes(3, &ENDGAME, Color::White, 2812);
    }
    #[test]
    fn test_endgame_perft_4() {
        test_perft_diagram_nodes(4, &ENDGAME, Color::White, 43238);
    }
}

#[cfg(test)]
mod pinned_promotions_perft {
    use crate::test_perft_diagram_nodes;
    use arbiter::Color;

    const POSITION: [&str; 8] = [
        "r...k..r", "Pppp.ppp", ".b...nbN", "nP......", "BBP.P...", "q....N..", "Pp.P..PP",
        "R..Q.RK.",
    ];

    #[test]
    fn test_pinned_promotions_perft_1() {
        test_perft_diagram_nodes(1, &POSITION, Color::White, 6);
    }
    #[test]
    fn test_pinned_promotions_perft_2() {
        test_perft_diagram_nodes(2, &POSITION, Color::White, 264);
    }
    #[test]
    fn test_pinned_promotions_perft_3() {
        test_perft_diagram_nodes(3, &POSITION, Color::White, 9467);
    }
}

#[cfg(test)]
mod underpromotion_perft {
    use crate::test_perft_diagram_nodes;
    use arbiter::Color;

    const POSITION: [&str; 8] = [
        "rnbq.k.r", "pp.Pbppp", "..p.....", "........", "..B.....", "........", "PPP.NnPP",
        "RNBQK..R",
    ];

    #[test]
    fn test_underpromotion_perft_1() {
        test_perft_diagram_nodes(1, &POSITION, Color::White, 44);
    }
    #[test]
    fn test_underpromotion_perft_2() {
        test_perft_diagram_nodes(2, &POSITION, Color::White, 1486);
    }
    #[test]
    fn test_underpromotion_perft_3() {
        test_perft_diagram_nodes(3, &POSITION, Color::White, 62379);
    }
}

#[cfg(test)]
mod promotion_perft {
    use crate::test_perft_diagram_nodes;
    use arbiter::Color;

    const POSITION: [&str; 8] = [
        "n.n.....", "PPPk....", "........", "........", "........", "........", "....Kppp",
        ".....N.N",
    ];

    #[test]
    fn test_promotion_perft_1() {
        test_perft_diagram_nodes(1, &POSITION, Color::Black, 24);
    }
    #[test]
    fn test_promotion_perft_2() {
        test_perft_diagram_nodes(2, &POSITION, Color::Black, 496);
    }
    #[test]
    fn test_promotion_perft_3() {
        test_perft_diagram_nodes(3, &POSITION, Color::Black, 9483);
    }
}
