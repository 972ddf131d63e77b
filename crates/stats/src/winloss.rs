use wri_model::{GameTypeBucket, HiddenState, WinLoss};

/// Known (victory_xp, defeat_xp) base-XP constant pairs, used only when
/// `hidden.battle_result` is absent. Spec.md §4.2/§8 scenario 6 names the
/// clan-battle pair explicitly; other buckets have no known constant pair
/// and fall through to `Unknown`.
fn xp_constants(game_type: GameTypeBucket) -> Option<(i64, i64)> {
    match game_type {
        GameTypeBucket::Clan => Some((300_000, 150_000)),
        _ => None,
    }
}

/// Primary rule: compare `hidden.battle_result.winner_team_id` to the own
/// player's `teamId`. Fallback (only when `battle_result` is absent): a
/// game-type-specific XP heuristic. If neither is available, `Unknown`.
pub fn determine_win_loss(hidden: &HiddenState, own_team_id: i64, game_type: GameTypeBucket, own_base_xp: Option<i64>) -> WinLoss {
    if let Some(winner) = hidden.winner_team_id {
        return if winner == -1 {
            WinLoss::Draw
        } else if winner == own_team_id {
            WinLoss::Win
        } else {
            WinLoss::Loss
        };
    }

    if let (Some(base_xp), Some((victory_xp, defeat_xp))) = (own_base_xp, xp_constants(game_type)) {
        if base_xp == victory_xp {
            return WinLoss::Win;
        }
        if base_xp == defeat_xp {
            return WinLoss::Loss;
        }
    }

    WinLoss::Unknown
}
