//! Prompt templates sent to the text model.

/// Game title the prompts target.
const GAME: &str = "F1 25";

/// Prompt asking for one setup as a single JSON object.
///
/// The skeleton below fixes every key the
/// [`GeneratedSetup`](pitlane_core::GeneratedSetup) parser expects.
pub fn setup_prompt(
    circuit: &str,
    session_type: &str,
    weather_qualifying: &str,
    weather_race: &str,
) -> String {
    let setup_type = session_type.to_uppercase();
    format!(
        r#"You are an expert {GAME} setup researcher. Provide the best {session_type} setup for the track and weather conditions below.

Respond ONLY with valid JSON. No explanations, no markdown, no extra text.

Base the setup on well-known sources: F1Laps, SimRacingSetups, pro players, community-recommended setups.

Track: {circuit}
Session: {session_type}
Qualifying Weather: {weather_qualifying}
Race Weather: {weather_race}

Instructions:
1. Prefer setups with high community ratings or from professional sim racers.
2. Use real circuit data for {circuit} in the track fields.
3. Give a tyre strategy suited to the weather.
4. Give 3-4 driving tips specific to {circuit}.

Return exactly this JSON structure with realistic values:
{{
    "trackName": "{circuit}",
    "carModel": "",
    "gameVersion": "{GAME}",
    "weatherCondition": "{weather_qualifying} / {weather_race}",
    "setupType": "{setup_type}",
    "imageUrl": "",
    "isFavorite": false,
    "frontWingAero": 0,
    "rearWingAero": 0,
    "onThrottle": 0,
    "offThrottle": 0,
    "engineBraking": 0,
    "frontCamber": 0.0,
    "rearCamber": 0.0,
    "frontToe": 0.0,
    "rearToe": 0.0,
    "frontSuspension": 0,
    "rearSuspension": 0,
    "frontAntiRollBar": 0,
    "rearAntiRollBar": 0,
    "frontRideHeight": 0,
    "rearRideHeight": 0,
    "brakePressure": 0,
    "frontBrakeBias": 0,
    "frontLeftTyrePsi": 0.0,
    "frontRightTyrePsi": 0.0,
    "rearLeftTyrePsi": 0.0,
    "rearRightTyrePsi": 0.0,
    "tyreStrategy": "",
    "keyPointers": "",
    "creatorNotes": "",
    "trackLength": "",
    "trackCorners": "",
    "trackDrsZones": "",
    "trackIdealLaps": ""
}}

Rules:
1. Return raw JSON only, without code fences.
2. Use in-game ranges (aero 0-50, camber -3.5 to -1.0).
3. Include every field.
4. No trailing commas.
5. Keep text fields to 2-3 sentences.

Start your response with {{ and end with }}."#
    )
}

/// Prompt for a free-form question to the setup assistant.
pub fn chat_prompt(message: &str) -> String {
    format!(
        r#"You are a {GAME} setup expert answering questions about car setups, track strategy and car settings.

Instructions:
1. Answer for {GAME}, not earlier titles.
2. Keep the answer short (at most 200 words).
3. When giving values use the in-game ranges:
   - Aero: front/rear 0-50
   - Camber: -3.5 to -1.0
   - Toe: -0.50 to 0.50
   - Suspension and anti-roll bars: 1-11
   - Ride height: 0-100 mm
   - Brake pressure: 80-100%
   - Brake bias: 50-70% front
   - Tyre pressure: 19.0-25.0 PSI
4. Give practical, track-specific advice where it helps.

Question:
{message}

Answer:"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_prompt_embeds_request_and_skeleton() {
        let prompt = setup_prompt("Monza", "Race", "Dry", "Wet");
        assert!(prompt.contains("Track: Monza"));
        assert!(prompt.contains(r#""weatherCondition": "Dry / Wet""#));
        assert!(prompt.contains(r#""setupType": "RACE""#));
        assert!(prompt.contains("No trailing commas"));
        assert!(prompt.contains(r#""trackIdealLaps": """#));
    }

    #[test]
    fn chat_prompt_carries_question() {
        let prompt = chat_prompt("How much front wing at Monaco?");
        assert!(prompt.ends_with("How much front wing at Monaco?\n\nAnswer:"));
    }
}
