//! Which panel receives keys and the highlight border.

/// Focusable panels, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    #[default]
    ProcessList,
    AiPanel,
    ScanPanel,
}

/// Result of pressing Esc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeOutcome {
    Focused(FocusTarget),
    /// Esc on the process list leaves the application.
    Exit,
}

#[derive(Debug, Default)]
pub struct FocusController {
    current: FocusTarget,
}

impl FocusController {
    pub fn current(&self) -> FocusTarget {
        self.current
    }

    pub fn is_focused(&self, target: FocusTarget) -> bool {
        self.current == target
    }

    pub fn cycle(&mut self) -> FocusTarget {
        self.current = match self.current {
            FocusTarget::ProcessList => FocusTarget::AiPanel,
            FocusTarget::AiPanel => FocusTarget::ScanPanel,
            FocusTarget::ScanPanel => FocusTarget::ProcessList,
        };
        self.current
    }

    pub fn escape(&mut self) -> EscapeOutcome {
        match self.current {
            FocusTarget::ProcessList => EscapeOutcome::Exit,
            _ => {
                self.current = FocusTarget::ProcessList;
                EscapeOutcome::Focused(self.current)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_process_list() {
        assert_eq!(FocusController::default().current(), FocusTarget::ProcessList);
    }

    #[test]
    fn three_cycles_return_to_start() {
        let mut focus = FocusController::default();
        assert_eq!(focus.cycle(), FocusTarget::AiPanel);
        assert_eq!(focus.cycle(), FocusTarget::ScanPanel);
        assert_eq!(focus.cycle(), FocusTarget::ProcessList);
    }

    #[test]
    fn escape_from_panel_returns_to_list() {
        let mut focus = FocusController::default();
        focus.cycle();
        assert_eq!(
            focus.escape(),
            EscapeOutcome::Focused(FocusTarget::ProcessList)
        );
        assert!(focus.is_focused(FocusTarget::ProcessList));
    }

    #[test]
    fn escape_from_scan_panel_returns_to_list() {
        let mut focus = FocusController::default();
        focus.cycle();
        focus.cycle();
        assert_eq!(
            focus.escape(),
            EscapeOutcome::Focused(FocusTarget::ProcessList)
        );
    }

    #[test]
    fn escape_from_list_exits() {
        let mut focus = FocusController::default();
        assert_eq!(focus.escape(), EscapeOutcome::Exit);
        assert_eq!(focus.current(), FocusTarget::ProcessList);
    }

    #[test]
    fn exactly_one_target_is_focused() {
        let mut focus = FocusController::default();
        let all = [
            FocusTarget::ProcessList,
            FocusTarget::AiPanel,
            FocusTarget::ScanPanel,
        ];
        for _ in 0..4 {
            assert_eq!(all.iter().filter(|t| focus.is_focused(**t)).count(), 1);
            focus.cycle();
        }
    }
}
