//! Conversion from provider DTOs to [`DirectionsResult`].
//!
//! Both wire formats end up here so the rest of the crate only ever sees
//! decoded coordinates and plain-text steps.

use crate::domain::{DirectionsResult, Step, format_distance, format_duration};

use super::error::DirectionsError;
use super::polyline::decode_polyline;
use super::types::{
    ComputeRoutesResponse, LegacyDirectionsResponse, LegacyLeg, LegacyStep, RoutesStep,
};

/// Strip markup from an instruction and normalise whitespace.
///
/// Block-level tags become a space so that `"left<div>Destination"` does not
/// run words together; `&nbsp;` and U+00A0 become ordinary spaces.
///
/// ```
/// use campus_nav::directions::strip_html;
///
/// assert_eq!(
///     strip_html("Turn <b>left</b> onto <b>Rue Guy</b>"),
///     "Turn left onto Rue Guy"
/// );
/// assert_eq!(strip_html("Route&nbsp;138"), "Route 138");
/// ```
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        text.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) => {
                if is_block_tag(&rest[open + 1..open + close]) {
                    text.push(' ');
                }
                rest = &rest[open + close + 1..];
            }
            None => {
                // Unterminated tag: keep the remainder verbatim.
                rest = &rest[open..];
                break;
            }
        }
    }
    text.push_str(rest);

    let text = text
        .replace("&nbsp;", " ")
        .replace('\u{a0}', " ")
        .replace("&amp;", "&");

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_block_tag(tag: &str) -> bool {
    let name = tag
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();
    matches!(name.as_str(), "div" | "br" | "p")
}

/// Structured transit detail for one step, borrowed from either wire format.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitInfo<'a> {
    pub vehicle: Option<&'a str>,
    pub line: Option<&'a str>,
    pub headsign: Option<&'a str>,
    pub departure_stop: Option<&'a str>,
    pub arrival_stop: Option<&'a str>,
}

/// Build `"Take {vehicle} {line} towards {headsign} from {stop}. Get off at {stop}"`.
///
/// Returns `None` when neither a vehicle nor a line is known, in which case
/// the provider's own instruction is more useful.
pub fn transit_instruction(info: &TransitInfo<'_>) -> Option<String> {
    if info.vehicle.is_none() && info.line.is_none() {
        return None;
    }

    let mut s = format!("Take {}", info.vehicle.unwrap_or("transit"));
    if let Some(line) = info.line {
        s.push(' ');
        s.push_str(line);
    }
    if let Some(headsign) = info.headsign {
        s.push_str(" towards ");
        s.push_str(headsign);
    }
    if let Some(from) = info.departure_stop {
        s.push_str(" from ");
        s.push_str(from);
    }
    if let Some(to) = info.arrival_stop {
        s.push_str(". Get off at ");
        s.push_str(to);
    }
    Some(s)
}

/// Parse a protobuf-style duration such as `"754s"` into whole seconds.
fn parse_proto_duration(s: &str) -> Option<i64> {
    s.trim()
        .strip_suffix('s')?
        .parse::<f64>()
        .ok()
        .map(|v| v.round() as i64)
}

fn convert_routes_step(step: &RoutesStep) -> Step {
    let plain = step
        .navigation_instruction
        .as_ref()
        .and_then(|n| n.instructions.as_deref())
        .map(strip_html)
        .unwrap_or_default();

    let instruction = step
        .transit_details
        .as_ref()
        .and_then(|t| {
            let line = t.transit_line.as_ref();
            let stops = t.stop_details.as_ref();
            transit_instruction(&TransitInfo {
                vehicle: line
                    .and_then(|l| l.vehicle.as_ref())
                    .and_then(|v| v.name.as_ref())
                    .map(|n| n.text.as_str()),
                line: line.and_then(|l| l.name_short.as_deref().or(l.name.as_deref())),
                headsign: t.headsign.as_deref(),
                departure_stop: stops
                    .and_then(|s| s.departure_stop.as_ref())
                    .and_then(|s| s.name.as_deref()),
                arrival_stop: stops
                    .and_then(|s| s.arrival_stop.as_ref())
                    .and_then(|s| s.name.as_deref()),
            })
        })
        .unwrap_or(plain);

    let localized = step.localized_values.as_ref();
    let distance = localized
        .and_then(|l| l.distance.as_ref())
        .map(|t| t.text.clone())
        .or_else(|| step.distance_meters.map(|m| format_distance(m as f64)))
        .unwrap_or_default();
    let duration = localized
        .and_then(|l| l.static_duration.as_ref())
        .map(|t| t.text.clone())
        .or_else(|| {
            step.static_duration
                .as_deref()
                .and_then(parse_proto_duration)
                .map(format_duration)
        })
        .unwrap_or_default();

    Step::new(instruction, distance, duration)
}

/// Normalise a `computeRoutes` response, using its first route.
pub fn convert_routes_response(
    response: &ComputeRoutesResponse,
) -> Result<DirectionsResult, DirectionsError> {
    let route = response
        .routes
        .first()
        .ok_or_else(|| DirectionsError::NoRoute {
            detail: "provider returned no routes".to_string(),
        })?;

    let polyline = match &route.polyline {
        Some(p) => decode_polyline(&p.encoded_polyline)?,
        None => Vec::new(),
    };

    let steps = route
        .legs
        .iter()
        .flat_map(|leg| leg.steps.iter())
        .map(convert_routes_step)
        .collect();

    let localized = route.localized_values.as_ref();
    let distance_text = localized
        .and_then(|l| l.distance.as_ref())
        .map(|t| t.text.clone())
        .or_else(|| route.distance_meters.map(|m| format_distance(m as f64)))
        .unwrap_or_default();
    let duration_text = localized
        .and_then(|l| l.duration.as_ref())
        .map(|t| t.text.clone())
        .or_else(|| {
            route
                .duration
                .as_deref()
                .and_then(parse_proto_duration)
                .map(format_duration)
        })
        .unwrap_or_default();

    Ok(DirectionsResult {
        polyline,
        steps,
        distance_text,
        duration_text,
    })
}

fn convert_legacy_step(step: &LegacyStep) -> Step {
    let plain = step
        .html_instructions
        .as_deref()
        .map(strip_html)
        .unwrap_or_default();

    let is_transit = step.travel_mode.as_deref() == Some("TRANSIT");
    let instruction = step
        .transit_details
        .as_ref()
        .filter(|_| is_transit)
        .and_then(|t| {
            let line = t.line.as_ref();
            transit_instruction(&TransitInfo {
                vehicle: line
                    .and_then(|l| l.vehicle.as_ref())
                    .and_then(|v| v.name.as_deref()),
                line: line.and_then(|l| l.short_name.as_deref().or(l.name.as_deref())),
                headsign: t.headsign.as_deref(),
                departure_stop: t.departure_stop.as_ref().and_then(|s| s.name.as_deref()),
                arrival_stop: t.arrival_stop.as_ref().and_then(|s| s.name.as_deref()),
            })
        })
        .unwrap_or(plain);

    Step::new(
        instruction,
        step.distance.as_ref().map(|d| d.text.clone()).unwrap_or_default(),
        step.duration.as_ref().map(|d| d.text.clone()).unwrap_or_default(),
    )
}

/// Leg totals: the provider's own text for a single leg, otherwise the sum
/// of the numeric values reformatted.
fn leg_totals(legs: &[LegacyLeg]) -> (String, String) {
    if let [leg] = legs {
        return (
            leg.distance.as_ref().map(|d| d.text.clone()).unwrap_or_default(),
            leg.duration.as_ref().map(|d| d.text.clone()).unwrap_or_default(),
        );
    }
    if legs.is_empty() {
        return (String::new(), String::new());
    }

    let meters: f64 = legs
        .iter()
        .filter_map(|l| l.distance.as_ref().and_then(|d| d.value))
        .sum();
    let secs: f64 = legs
        .iter()
        .filter_map(|l| l.duration.as_ref().and_then(|d| d.value))
        .sum();
    (format_distance(meters), format_duration(secs.round() as i64))
}

/// Normalise a `directions/json` response, using its first route.
pub fn convert_legacy_response(
    response: &LegacyDirectionsResponse,
) -> Result<DirectionsResult, DirectionsError> {
    match response.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" | "NOT_FOUND" => {
            return Err(DirectionsError::NoRoute {
                detail: response.status.clone(),
            });
        }
        other => {
            return Err(DirectionsError::Provider {
                status: other.to_string(),
                message: response.error_message.clone().unwrap_or_default(),
            });
        }
    }

    let route = response
        .routes
        .first()
        .ok_or_else(|| DirectionsError::NoRoute {
            detail: "provider returned no routes".to_string(),
        })?;

    let polyline = match &route.overview_polyline {
        Some(p) => decode_polyline(&p.points)?,
        None => Vec::new(),
    };

    let steps = route
        .legs
        .iter()
        .flat_map(|leg| leg.steps.iter())
        .map(convert_legacy_step)
        .collect();

    let (distance_text, duration_text) = leg_totals(&route.legs);

    Ok(DirectionsResult {
        polyline,
        steps,
        distance_text,
        duration_text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy(json: &str) -> LegacyDirectionsResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn strip_html_handles_block_tags() {
        assert_eq!(
            strip_html(
                "Turn <b>left</b><div style=\"font-size:0.9em\">Destination will be on the right</div>"
            ),
            "Turn left Destination will be on the right"
        );
        assert_eq!(strip_html("A<br/>B"), "A B");
        assert_eq!(strip_html("Plain text"), "Plain text");
        assert_eq!(strip_html("Rue St-Jacques &amp; Guy"), "Rue St-Jacques & Guy");
        assert_eq!(strip_html("broken <b tag"), "broken <b tag");
        assert_eq!(strip_html("a\u{a0}b"), "a b");
    }

    #[test]
    fn transit_instruction_formats() {
        let info = TransitInfo {
            vehicle: Some("Bus"),
            line: Some("105"),
            headsign: Some("Ouest"),
            departure_stop: Some("Sherbrooke / Guy"),
            arrival_stop: Some("Sherbrooke / West Broadway"),
        };
        assert_eq!(
            transit_instruction(&info).unwrap(),
            "Take Bus 105 towards Ouest from Sherbrooke / Guy. Get off at Sherbrooke / West Broadway"
        );

        assert!(transit_instruction(&TransitInfo::default()).is_none());

        let partial = TransitInfo {
            line: Some("Orange"),
            ..TransitInfo::default()
        };
        assert_eq!(transit_instruction(&partial).unwrap(), "Take transit Orange");
    }

    #[test]
    fn legacy_walking_fixture() {
        let response = legacy(include_str!("../../data/mock_directions/walking.json"));
        let result = convert_legacy_response(&response).unwrap();

        assert_eq!(result.polyline.len(), 3);
        assert_eq!(result.distance_text, "0.2 km");
        assert_eq!(result.duration_text, "3 mins");
        assert_eq!(result.steps.len(), 2);
        assert_eq!(
            result.steps[0].instruction,
            "Head northwest on Rue Sainte-Catherine O toward Rue Mackay"
        );
        assert!(result.steps[1].instruction.contains("Destination"));
    }

    #[test]
    fn legacy_transit_fixture_synthesizes_instruction() {
        let response = legacy(include_str!("../../data/mock_directions/transit.json"));
        let result = convert_legacy_response(&response).unwrap();

        assert_eq!(result.steps[0].instruction, "Walk to Guy-Concordia");
        assert_eq!(
            result.steps[1].instruction,
            "Take Bus 105 towards Ouest from Sherbrooke / Guy. Get off at Sherbrooke / West Broadway"
        );
    }

    #[test]
    fn legacy_nbsp_collapsed() {
        let response = legacy(include_str!("../../data/mock_directions/driving.json"));
        let result = convert_legacy_response(&response).unwrap();
        assert_eq!(
            result.steps[1].instruction,
            "Continue onto Rue Sherbrooke O (Route 138)"
        );
    }

    #[test]
    fn legacy_zero_results_is_no_route() {
        let response = legacy(r#"{"status": "ZERO_RESULTS", "routes": []}"#);
        assert!(matches!(
            convert_legacy_response(&response),
            Err(DirectionsError::NoRoute { .. })
        ));
    }

    #[test]
    fn legacy_denied_carries_message() {
        let response = legacy(
            r#"{"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid."}"#,
        );
        let err = convert_legacy_response(&response).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("REQUEST_DENIED"));
        assert!(message.contains("The provided API key is invalid."));
    }

    #[test]
    fn legacy_multiple_legs_are_summed() {
        let response = legacy(
            r#"{
                "status": "OK",
                "routes": [{
                    "legs": [
                        {"distance": {"text": "0.6 km", "value": 600}, "duration": {"text": "5 mins", "value": 300}},
                        {"distance": {"text": "0.9 km", "value": 900}, "duration": {"text": "8 mins", "value": 480}}
                    ]
                }]
            }"#,
        );
        let result = convert_legacy_response(&response).unwrap();
        assert_eq!(result.distance_text, "1.5 km");
        assert_eq!(result.duration_text, "13 min");
        assert!(result.polyline.is_empty());
    }

    #[test]
    fn routes_response_with_localized_values() {
        let response: ComputeRoutesResponse = serde_json::from_str(
            r#"{
                "routes": [{
                    "distanceMeters": 6800,
                    "duration": "1080s",
                    "polyline": {"encodedPolyline": "_p~iF~ps|U_ulLnnqC"},
                    "localizedValues": {
                        "distance": {"text": "6.8 km"},
                        "duration": {"text": "18 mins"}
                    },
                    "legs": [{
                        "steps": [
                            {
                                "distanceMeters": 120,
                                "staticDuration": "95s",
                                "navigationInstruction": {"maneuver": "TURN_LEFT", "instructions": "Turn <b>left</b>"},
                                "localizedValues": {"distance": {"text": "120 m"}, "staticDuration": {"text": "2 mins"}}
                            },
                            {
                                "distanceMeters": 6680,
                                "staticDuration": "985s",
                                "navigationInstruction": {"instructions": "Bus towards Ouest"},
                                "travelMode": "TRANSIT",
                                "transitDetails": {
                                    "stopDetails": {
                                        "departureStop": {"name": "Guy"},
                                        "arrivalStop": {"name": "West Broadway"}
                                    },
                                    "headsign": "Ouest",
                                    "transitLine": {
                                        "name": "Sherbrooke",
                                        "nameShort": "105",
                                        "vehicle": {"name": {"text": "Bus"}, "type": "BUS"}
                                    }
                                }
                            }
                        ]
                    }]
                }]
            }"#,
        )
        .unwrap();

        let result = convert_routes_response(&response).unwrap();
        assert_eq!(result.polyline.len(), 2);
        assert_eq!(result.distance_text, "6.8 km");
        assert_eq!(result.duration_text, "18 mins");
        assert_eq!(result.steps[0].instruction, "Turn left");
        assert_eq!(result.steps[0].distance, "120 m");
        assert_eq!(result.steps[0].duration, "2 mins");
        assert_eq!(
            result.steps[1].instruction,
            "Take Bus 105 towards Ouest from Guy. Get off at West Broadway"
        );
        // No localized values: formatted from the raw numbers.
        assert_eq!(result.steps[1].distance, "6.7 km");
        assert_eq!(result.steps[1].duration, "16 min");
    }

    #[test]
    fn routes_response_without_localized_values() {
        let response: ComputeRoutesResponse = serde_json::from_str(
            r#"{"routes": [{"distanceMeters": 450, "duration": "754s"}]}"#,
        )
        .unwrap();
        let result = convert_routes_response(&response).unwrap();
        assert_eq!(result.distance_text, "450 m");
        assert_eq!(result.duration_text, "13 min");
        assert!(result.steps.is_empty());
    }

    #[test]
    fn routes_empty_is_no_route() {
        let response: ComputeRoutesResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            convert_routes_response(&response),
            Err(DirectionsError::NoRoute { .. })
        ));
    }

    #[test]
    fn bad_polyline_is_an_error() {
        let response: ComputeRoutesResponse = serde_json::from_str(
            r#"{"routes": [{"polyline": {"encodedPolyline": "_p~iF"}}]}"#,
        )
        .unwrap();
        assert!(matches!(
            convert_routes_response(&response),
            Err(DirectionsError::Polyline(_))
        ));
    }

    #[test]
    fn proto_duration() {
        assert_eq!(parse_proto_duration("754s"), Some(754));
        assert_eq!(parse_proto_duration("0.5s"), Some(1));
        assert_eq!(parse_proto_duration("754"), None);
    }
}
