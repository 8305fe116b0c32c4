use geocache::prelude::*;

/// Glyphs used by [`render_neighborhood`].
#[derive(Debug, Clone, Copy)]
pub struct TextMapStyle {
    pub player: char,
    pub full_cache: char,
    pub empty_cache: char,
    pub blank: char,
}

impl Default for TextMapStyle {
    fn default() -> Self {
        Self {
            player: '@',
            full_cache: '$',
            empty_cache: 'o',
            blank: '.',
        }
    }
}

/// Renders the neighborhood of `player` as rows of glyphs, north at the top.
pub fn render_neighborhood<L: LuckSource>(
    world: &mut CacheWorld<L>,
    player: LatLng,
    style: TextMapStyle,
) -> Result<String> {
    let here = world.grid_mut().cell_at(player)?;
    let cells = world.grid_mut().neighborhood(player)?;
    let side = 2 * world.grid().visibility_radius() as usize;

    let mut out = String::with_capacity(cells.len() + side);
    for row in cells.chunks(side.max(1)).rev() {
        for cell in row {
            let glyph = if cell.id() == here.id() {
                style.player
            } else {
                match world.cache(cell.id()) {
                    Some(cache) if cache.is_empty() => style.empty_cache,
                    Some(_) => style.full_cache,
                    None => style.blank,
                }
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    Ok(out)
}
