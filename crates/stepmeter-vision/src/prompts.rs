//! Instruction prompt for meter-reading extraction

/// Fixed prompt sent with every photo. The model is told to answer with the
/// bare number so the digit strip in `parse_reading` has little left to do.
pub const READING_PROMPT: &str = "You are an expert electricity meter reader. \
Read the number shown on the meter display in this image. Respond ONLY with \
the number, no additional text. If several numbers are visible, respond with \
the main one indicating total consumption in kWh.";
