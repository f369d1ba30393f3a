use interview_session::presenter::{TurnIndicator, BAR_MAX, BAR_REST};
use interview_session::{CameraView, QuestionFrame, SessionFrame};

const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One text line per screen region.
pub fn render(frame: &SessionFrame) -> String {
    format!(
        "{}\n{}\n{}",
        avatar_line(frame),
        question_line(&frame.question),
        camera_line(frame)
    )
}

fn avatar_line(frame: &SessionFrame) -> String {
    let avatar = &frame.avatar;
    let cue = match avatar.indicator {
        TurnIndicator::Speaking => "(speaking)",
        TurnIndicator::Listening => "(listening)",
        TurnIndicator::Dormant => "",
    };
    let bars: String = avatar.bars.iter().map(|bar| level(bar.scale)).collect();
    format!(
        "{} - {} [{}] {} {}",
        avatar.name, avatar.subtitle, avatar.status_label, bars, cue
    )
    .trim_end()
    .to_string()
}

fn level(scale: f32) -> char {
    let t = ((scale - BAR_REST) / (BAR_MAX - BAR_REST)).clamp(0.0, 1.0);
    let index = (t * (LEVELS.len() - 1) as f32).round() as usize;
    LEVELS[index.min(LEVELS.len() - 1)]
}

fn question_line(question: &QuestionFrame) -> String {
    match question {
        QuestionFrame::Prompt { text } => format!("Q: {text}"),
        QuestionFrame::Revealing { text, cursor, .. } => {
            format!("Q: {text}{}", if *cursor { "|" } else { "" })
        }
    }
}

fn camera_line(frame: &SessionFrame) -> String {
    let view = match &frame.camera.view {
        CameraView::Placeholder { caption } | CameraView::Loading { caption } => caption.to_string(),
        CameraView::Live {
            stream_id,
            recording,
            quality,
            ..
        } => format!(
            "live {stream_id} {quality}{}",
            if *recording { " REC" } else { "" }
        ),
        CameraView::Error { message } => format!("error: {message}"),
    };
    format!("Camera: {view} ({})", frame.camera.name_badge)
}
