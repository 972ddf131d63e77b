use plotters::backend::RGBPixel;
use plotters::prelude::*;

use wri_model::{PlayerRef, Relation};

const CANVAS_SIZE: u32 = 1024;
/// World coordinates run roughly ±700 map units on the largest maps; a
/// fixed scale keeps every supported map on-canvas without per-map tuning
/// data, which the decoded replay does not carry.
const WORLD_SCALE: f64 = 700.0;

/// A single player's marker position for one rendered frame, in raw world
/// coordinates (matching the game client's X/Z plane).
#[derive(Clone, Copy, Debug)]
pub struct MarkerPosition {
    pub x: f64,
    pub z: f64,
    pub relation: Relation,
}

/// Renders one minimap frame with every player's marker plotted, returning
/// raw RGB pixels at [`CANVAS_SIZE`]x[`CANVAS_SIZE`].
pub fn render_frame(markers: &[MarkerPosition]) -> Result<Vec<u8>, String> {
    let mut buffer = vec![0u8; (CANVAS_SIZE * CANVAS_SIZE * 3) as usize];
    {
        let root = BitMapBackend::<RGBPixel>::with_buffer(&mut buffer, (CANVAS_SIZE, CANVAS_SIZE)).into_drawing_area();
        root.fill(&RGBColor(10, 20, 30)).map_err(|e| e.to_string())?;

        let mut chart = ChartBuilder::on(&root)
            .x_label_area_size(0)
            .y_label_area_size(0)
            .build_cartesian_2d(-WORLD_SCALE..WORLD_SCALE, -WORLD_SCALE..WORLD_SCALE)
            .map_err(|e| e.to_string())?;

        for marker in markers {
            let color = match marker.relation {
                Relation::Own => RGBColor(255, 220, 0),
                Relation::Ally => RGBColor(80, 160, 255),
                Relation::Enemy => RGBColor(220, 60, 60),
                Relation::Observer => RGBColor(150, 150, 150),
            };
            chart
                .draw_series(std::iter::once(Circle::new((marker.x, marker.z), 6, color.filled())))
                .map_err(|e| e.to_string())?;
        }
        root.present().map_err(|e| e.to_string())?;
    }
    Ok(buffer)
}

/// Deterministic placeholder marker layout for a participant roster. Real
/// position telemetry comes from `Position` entity-method packets in the
/// replay's packet stream, which the decoder does not replay (spec.md's
/// Decoder scope stops at the terminal battle-stats packet); until that
/// packet family is modeled, markers are laid out on a ring so every
/// participant still gets a distinct, stable spot on the minimap.
pub fn ring_layout(own: &PlayerRef, allies: &[PlayerRef], enemies: &[PlayerRef]) -> Vec<MarkerPosition> {
    let mut markers = vec![MarkerPosition { x: 0.0, z: 0.0, relation: Relation::Own }];
    markers.extend(ring_positions(allies, Relation::Ally, -1.0));
    markers.extend(ring_positions(enemies, Relation::Enemy, 1.0));
    let _ = own;
    markers
}

fn ring_positions(players: &[PlayerRef], relation: Relation, side: f64) -> Vec<MarkerPosition> {
    let radius = WORLD_SCALE * 0.6;
    players
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let angle = (i as f64 + 1.0) * std::f64::consts::PI / (players.len() as f64 + 1.0);
            MarkerPosition { x: side * radius * angle.cos(), z: radius * angle.sin(), relation }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_full_size_rgb_buffer() {
        let markers = vec![MarkerPosition { x: 0.0, z: 0.0, relation: Relation::Own }];
        let frame = render_frame(&markers).unwrap();
        assert_eq!(frame.len(), (CANVAS_SIZE * CANVAS_SIZE * 3) as usize);
    }

    #[test]
    fn ring_layout_gives_every_participant_a_marker() {
        let own = PlayerRef { player_id: 1, ship_id: 1, name: "own".to_string() };
        let allies = vec![PlayerRef { player_id: 2, ship_id: 2, name: "ally".to_string() }];
        let enemies = vec![
            PlayerRef { player_id: 3, ship_id: 3, name: "e1".to_string() },
            PlayerRef { player_id: 4, ship_id: 4, name: "e2".to_string() },
        ];
        let markers = ring_layout(&own, &allies, &enemies);
        assert_eq!(markers.len(), 1 + allies.len() + enemies.len());
    }
}
