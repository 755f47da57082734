/// Reasons a screen state machine refused a transition.
///
/// None of these are fatal. The UI normally prevents them by disabling the
/// triggering control, so systems log them at `debug!` and carry on.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionError {
    IndexOutOfRange { index: usize, len: usize },
    NotAssigned(usize),
    OutsideImage { x: f32, y: f32 },
    NotEditing,
    Incomplete,
    AlreadyPaired(String),
    UnknownElectrode(String),
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionError::IndexOutOfRange { index, len } => {
                write!(f, "index {} is out of range for {} items", index, len)
            }
            TransitionError::NotAssigned(index) => write!(f, "landmark {} has no position yet", index),
            TransitionError::OutsideImage { x, y } => write!(f, "point ({:.1}, {:.1}) lies outside the image", x, y),
            TransitionError::NotEditing => write!(f, "no connection is being edited"),
            TransitionError::Incomplete => write!(f, "connection needs both a sphere and a head electrode"),
            TransitionError::AlreadyPaired(name) => write!(f, "electrode {} is already paired", name),
            TransitionError::UnknownElectrode(name) => write!(f, "unknown electrode {}", name),
        }
    }
}

impl std::error::Error for TransitionError {}

pub(crate) fn check_index(index: usize, len: usize) -> Result<(), TransitionError> {
    if index < len {
        Ok(())
    } else {
        Err(TransitionError::IndexOutOfRange { index, len })
    }
}
