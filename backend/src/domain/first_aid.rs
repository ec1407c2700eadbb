//! Built-in first-aid guidance shown to patients while they wait for an
//! ambulance. Only some emergencies carry guidance.

use shared::{EmergencyType, Language};

/// Instructions for `emergency` in `language`, if any exist
pub fn instructions(emergency: EmergencyType, language: Language) -> Option<&'static str> {
    let text = match (emergency, language) {
        (EmergencyType::HeartAttack, Language::En) => {
            "Call emergency services immediately. Have the person sit down and rest. Give aspirin if available and not allergic."
        }
        (EmergencyType::HeartAttack, Language::Kn) => {
            "ತುರ್ತು ಸೇವೆಗಳಿಗೆ ತಕ್ಷಣ ಕರೆ ಮಾಡಿ. ವ್ಯಕ್ತಿಯನ್ನು ಕುಳಿತುಕೊಳ್ಳಿಸಿ ವಿಶ್ರಾಂತಿ ನೀಡಿ."
        }
        (EmergencyType::HeartAttack, Language::Tcy) => {
            "ತುರ್ತು ಸೇವೆಗೆ ಕರೆ ಮಲ್ಪುಲೆ. ಆ ವ್ಯಕ್ತಿನ್ ಕೂರ್ಚಿ ವಿಶ್ರಾಂತಿ ಕೊಡುಲೆ."
        }
        (EmergencyType::HeartAttack, Language::Kok) => "तुरंत आपातकालीन सेवांक कॉल करा. व्यक्तीक बसोवन विश्राम दिया.",
        (EmergencyType::Stroke, Language::En) => {
            "Call emergency services. Check for FAST signs: Face drooping, Arm weakness, Speech difficulty, Time to call."
        }
        (EmergencyType::Stroke, Language::Kn) => "ತುರ್ತು ಸೇವೆಗಳಿಗೆ ಕರೆ ಮಾಡಿ. FAST ಚಿಹ್ನೆಗಳನ್ನು ಪರಿಶೀಲಿಸಿ.",
        (EmergencyType::Stroke, Language::Tcy) => "ತುರ್ತು ಸೇವೆಗೆ ಕರೆ ಮಲ್ಪುಲೆ. FAST ಚಿಹ್ನೆಲೆನ್ ಪರಿಶೀಲಿಸುಲೆ.",
        (EmergencyType::Stroke, Language::Kok) => "आपातकालीन सेवांक कॉल करा. FAST चिन्हां तपासा.",
        _ => return None,
    };
    Some(text)
}
