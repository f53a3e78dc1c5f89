//! The two Fritz-Kola maps: locations, routes, legends and titles.

use clap::ValueEnum;
use map_common::{
    BoundingBox, Category, Color, GeoPoint, Label, LabelPlacement, Location, MarkerShape,
    MarkerStyle, Route,
};
use renderer::legend::{Legend, LegendCorner, LegendEntry};
use renderer::map::{AxisTitles, BackendPreference, LabelStyle, MapDocument, RectOverlay};
use renderer::markers::LineStyle;

/// Production site in Hamburg.
pub const HAMBURG: GeoPoint = GeoPoint::new(9.9937, 53.5511);

pub const SUPPLY_CHAIN_FILE: &str = "fritz-kola-supply-chain-map.png";
pub const MANUFACTURER_FILE: &str = "fritz-kola-manufacturer-map.png";

/// Which program is running. The full edition labels everything in three
/// languages and may use feature layers; the simple one sticks to English
/// and German on a plain grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edition {
    Full,
    Simple,
}

impl Edition {
    pub fn banner(&self) -> &'static str {
        match self {
            Edition::Full => "Fritz-Kola Map Generator",
            Edition::Simple => "Fritz-Kola Simple Map Generator",
        }
    }

    /// Whether a failed run should end with a non-zero exit status.
    pub fn fails_loudly(&self) -> bool {
        matches!(self, Edition::Full)
    }

    fn label(&self, en: &str, de: &str, zh: &str) -> Label {
        let label = Label::new(en).de(de);
        match self {
            Edition::Full => label.zh(zh),
            Edition::Simple => label,
        }
    }

    fn legend_title(&self) -> Label {
        self.label("Legend", "Legende", "图例")
    }

    fn axis_titles(&self, font_pt: f32) -> AxisTitles {
        AxisTitles {
            x: self.label("Longitude", "Längengrad", "经度"),
            y: self.label("Latitude", "Breitengrad", "纬度"),
            font_pt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MapKind {
    /// Distribution network across central Europe
    SupplyChain,
    /// Close-up of the Hamburg production site
    Manufacturer,
}

impl MapKind {
    pub const ALL: [MapKind; 2] = [MapKind::SupplyChain, MapKind::Manufacturer];

    pub fn description(&self) -> &'static str {
        match self {
            MapKind::SupplyChain => "supply chain map",
            MapKind::Manufacturer => "manufacturer location map",
        }
    }

    pub fn document(&self, edition: Edition) -> MapDocument {
        match self {
            MapKind::SupplyChain => supply_chain_map(edition),
            MapKind::Manufacturer => manufacturer_map(edition),
        }
    }
}

fn production_marker() -> MarkerStyle {
    MarkerStyle::new(Color::RED, MarkerShape::Circle, 300.0)
}

fn distribution_marker() -> MarkerStyle {
    MarkerStyle::new(Color::BLUE, MarkerShape::Circle, 150.0)
}

fn market_marker() -> MarkerStyle {
    MarkerStyle::new(Color::GREEN, MarkerShape::Circle, 100.0)
}

/// Production, distribution hubs and export markets with delivery routes.
pub fn supply_chain_map(edition: Edition) -> MapDocument {
    let label = match edition {
        Edition::Full => LabelPlacement::Text { dlon: 0.2, dlat: 0.1 },
        Edition::Simple => LabelPlacement::Text { dlon: 0.15, dlat: 0.08 },
    };
    let site = |name: &str, lon: f64, lat: f64, category: Category, marker: MarkerStyle| {
        Location::new(name, GeoPoint::new(lon, lat), category, marker, label)
    };

    let locations = vec![
        Location::new(
            "Hamburg (Production)",
            HAMBURG,
            Category::Production,
            production_marker(),
            label,
        ),
        site(
            "Berlin",
            13.4050,
            52.5200,
            Category::Distribution,
            distribution_marker(),
        ),
        site(
            "Munich",
            11.5820,
            48.1351,
            Category::Distribution,
            distribution_marker(),
        ),
        site(
            "Cologne",
            6.9603,
            50.9375,
            Category::Distribution,
            distribution_marker(),
        ),
        site(
            "Amsterdam",
            4.9041,
            52.3676,
            Category::Market,
            market_marker(),
        ),
        site(
            "Vienna",
            16.3738,
            48.2082,
            Category::Market,
            market_marker(),
        ),
        site("Zurich", 8.5417, 47.3769, Category::Market, market_marker()),
    ];

    let routes = vec![
        Route::new("Hamburg (Production)", "Berlin"),
        Route::new("Hamburg (Production)", "Munich"),
        Route::new("Hamburg (Production)", "Cologne"),
        Route::new("Cologne", "Amsterdam"),
        Route::new("Munich", "Vienna"),
        Route::new("Munich", "Zurich"),
    ];

    let legend = Legend::new(
        edition.legend_title(),
        LegendCorner::UpperLeft,
        vec![
            LegendEntry::marker(
                production_marker(),
                edition.label("Production", "Produktion", "生产"),
            ),
            LegendEntry::marker(
                distribution_marker(),
                edition.label("Distribution Center", "Vertriebszentrum", "分销中心"),
            ),
            LegendEntry::marker(market_marker(), edition.label("Market", "Markt", "市场")),
            LegendEntry::line(
                LineStyle::route(),
                edition.label("Supply Route", "Lieferroute", "供应路线"),
            ),
        ],
    );

    MapDocument {
        title: edition.label(
            "Fritz-Kola Supply Chain Map",
            "Fritz-Kola Supply-Chain-Karte",
            "Fritz-Kola 供应链地图",
        ),
        // Wide enough for Amsterdam and Vienna; the first drafts framed
        // lon 5..15, which leaves both cities off the map
        extent: BoundingBox::new(4.0, 47.0, 17.0, 56.0),
        figure_size: (14.0, 10.0),
        locations,
        routes,
        route_style: LineStyle::route(),
        overlays: Vec::new(),
        labels: LabelStyle {
            font_pt: 8.0,
            box_pad: 0.3,
            box_alpha: match edition {
                Edition::Full => 0.7,
                Edition::Simple => 0.8,
            },
        },
        legend,
        axis_titles: edition.axis_titles(match edition {
            Edition::Full => 10.0,
            Edition::Simple => 11.0,
        }),
        backend: match edition {
            Edition::Full => BackendPreference::PreferEnhanced,
            Edition::Simple => BackendPreference::BasicOnly,
        },
        background_tint: match edition {
            Edition::Full => None,
            Edition::Simple => Some(Color::LIGHT_GRAY.with_alpha(0.1)),
        },
        output_file: SUPPLY_CHAIN_FILE.to_string(),
    }
}

/// The production site, the port and the city centre around Hamburg.
pub fn manufacturer_map(edition: Edition) -> MapDocument {
    let factory = MarkerStyle::new(Color::RED, MarkerShape::Circle, 400.0).edge_width(2.0);
    let port = MarkerStyle::new(Color::BLUE, MarkerShape::Square, 200.0).edge_width(2.0);
    let center = MarkerStyle::new(Color::GREEN, MarkerShape::Triangle, 150.0).edge_width(2.0);

    let locations = vec![
        Location::new(
            "Fritz-Kola Production",
            HAMBURG,
            Category::Production,
            factory,
            LabelPlacement::Annotation { dx_pt: 15.0, dy_pt: 25.0 },
        ),
        Location::new(
            "Hamburg Port",
            GeoPoint::new(9.9786, 53.5438),
            Category::Port,
            port,
            LabelPlacement::Annotation { dx_pt: -20.0, dy_pt: -25.0 },
        ),
        Location::new(
            "City Center",
            GeoPoint::new(10.005, 53.5506),
            Category::CityCenter,
            center,
            LabelPlacement::Annotation { dx_pt: 15.0, dy_pt: -25.0 },
        ),
    ];

    // Rough outline of the city
    let city = RectOverlay {
        origin: HAMBURG.offset(-0.2, -0.15),
        width_deg: 0.4,
        height_deg: 0.3,
        face: Color::LIGHT_BLUE,
        edge: Color::NAVY,
        edge_width_pt: 2.0,
        alpha: 0.3,
    };

    let legend = Legend::new(
        edition.legend_title(),
        LegendCorner::UpperRight,
        vec![
            LegendEntry::marker(
                factory,
                edition.label("Production Facility", "Produktionsstätte", "生产设施"),
            ),
            LegendEntry::marker(port, edition.label("Port", "Hafen", "港口")),
            LegendEntry::marker(center, edition.label("City Center", "Stadtzentrum", "市中心")),
        ],
    );

    MapDocument {
        title: edition.label(
            "Fritz-Kola Manufacturer Location",
            "Fritz-Kola Herstellerstandort",
            "Fritz-Kola 制造商位置",
        ),
        extent: BoundingBox::centered(HAMBURG.lon, HAMBURG.lat, 0.35, 0.25),
        figure_size: (12.0, 10.0),
        locations,
        routes: Vec::new(),
        route_style: LineStyle::route(),
        overlays: vec![city],
        labels: LabelStyle {
            font_pt: 9.0,
            box_pad: 0.5,
            box_alpha: 0.8,
        },
        legend,
        axis_titles: edition.axis_titles(11.0),
        backend: BackendPreference::BasicOnly,
        background_tint: None,
        output_file: MANUFACTURER_FILE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_documents_validate() {
        for edition in [Edition::Full, Edition::Simple] {
            for kind in MapKind::ALL {
                let doc = kind.document(edition);
                assert!(doc.validate().is_ok(), "{:?} {:?}", edition, kind);
            }
        }
    }

    #[test]
    fn test_legend_sizes() {
        assert_eq!(supply_chain_map(Edition::Full).legend.len(), 4);
        assert_eq!(manufacturer_map(Edition::Full).legend.len(), 3);
        assert_eq!(supply_chain_map(Edition::Simple).legend.len(), 4);
    }

    #[test]
    fn test_routes_start_from_known_hubs() {
        let doc = supply_chain_map(Edition::Full);
        let routes = doc.resolved_routes().unwrap();
        assert_eq!(routes.len(), 6);
        assert_eq!(
            routes.iter().filter(|(from, _)| from.point == HAMBURG).count(),
            3
        );
    }

    #[test]
    fn test_simple_edition_has_no_chinese() {
        for kind in MapKind::ALL {
            let doc = kind.document(Edition::Simple);
            let mut texts = vec![doc.title.full(), doc.legend.title.full()];
            texts.extend(doc.legend.entries.iter().map(|e| e.label.full()));
            texts.push(doc.axis_titles.x.full());
            assert!(
                texts.iter().all(|t| t.chars().all(|c| (c as u32) < 0x3000)),
                "{:?}",
                texts
            );
        }
    }

    #[test]
    fn test_full_edition_is_trilingual() {
        let doc = supply_chain_map(Edition::Full);
        assert_eq!(
            doc.title.full(),
            "Fritz-Kola Supply Chain Map / Fritz-Kola Supply-Chain-Karte / Fritz-Kola 供应链地图"
        );
    }

    #[test]
    fn test_backend_preferences() {
        assert_eq!(
            supply_chain_map(Edition::Full).backend,
            BackendPreference::PreferEnhanced
        );
        assert_eq!(
            supply_chain_map(Edition::Simple).backend,
            BackendPreference::BasicOnly
        );
        assert_eq!(
            manufacturer_map(Edition::Full).backend,
            BackendPreference::BasicOnly
        );
    }

    #[test]
    fn test_manufacturer_extent_around_hamburg() {
        let doc = manufacturer_map(Edition::Full);
        assert!((doc.extent.width() - 0.7).abs() < 1e-9);
        assert!((doc.extent.height() - 0.5).abs() < 1e-9);
    }
}
