//! Keyword and structure based content typing for finished chunks.

use std::sync::LazyLock;

use hwctx_core::ContentType;
use regex::Regex;

use super::atomic::contains_table;
use super::section::is_heading_only;

struct Patterns {
    fence: Regex,
    register: Regex,
    pin: Regex,
    electrical: Regex,
    timing: Regex,
    errata: Regex,
    config_procedure: Regex,
    api: Regex,
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(|| Patterns {
    fence: Regex::new(r"(?m)^(?:`{3,}|~{3,})").expect("fence pattern"),
    register: Regex::new(
        r"(?i)\b(?:registers?|offset|reset\s+value|bits?|bit\s*fields?|access\s+type|read[/\s-](?:write|only)|write[/\s-]only|base\s+address)\b|\b0x[0-9a-f]{4,}\b",
    )
    .expect("register pattern"),
    pin: Regex::new(
        r"(?i:\b(?:alternate\s+functions?|remap(?:ped|ping)?|pin\s*(?:mapping|assignments?|configuration|out)|pinout)\b)|\bAF(?:\d{1,2}|x)\b|\bGPIO[A-Z]?\d*\b",
    )
    .expect("pin pattern"),
    electrical: Regex::new(
        r"\b\d+(?:\.\d+)?\s*(?:V|mV|mA|[µμ]A|uA|nA|kΩ)\b|(?i:\b(?:power\s+supply|supply\s+voltage|current\s+consumption|voltage\s+(?:range|level)|absolute\s+maximum)\b)|\bV(?:DD|CC|SS|DDA|BAT|REF)\w*\b",
    )
    .expect("electrical pattern"),
    timing: Regex::new(
        r"\b\d+(?:\.\d+)?\s*(?:ns|[µμ]s|us|ms|(?i:mhz|khz|ghz))\b|(?i:\b(?:setup\s+time|hold\s+time|propagation\s+delay|clock\s+(?:speed|frequency|period)|baud\s*rate)\b)",
    )
    .expect("timing pattern"),
    errata: Regex::new(
        r"(?i:\b(?:errat(?:a|um)|workarounds?|limitations?|silicon\s+bugs?|advisory|known\s+issues?)\b)|\bES\d{4}\b",
    )
    .expect("errata pattern"),
    config_procedure: Regex::new(
        r"(?i)\b(?:step\s*\d+|initiali[sz]ation\s+sequence|programming\s+(?:procedure|sequence)|following\s+steps|must\s+be\s+(?:set|cleared|configured)|should\s+be\s+configured)\b",
    )
    .expect("config procedure pattern"),
    api: Regex::new(
        r"(?m)^[ \t]*`?(?:#define[ \t]+[A-Za-z_]\w*|(?:(?:static|extern|inline|const|unsigned|signed|struct|enum)[ \t]+)*[A-Za-z_]\w*[ \t*]+[A-Za-z_]\w*[ \t]*\([^;{}\n]*\)[ \t]*;`?[ \t]*$)",
    )
    .expect("api pattern"),
});

/// Label a finished chunk. First match wins: code, then table subtypes,
/// then heading-only sections, then domain prose, then plain prose.
pub fn classify(text: &str) -> ContentType {
    let p = &*PATTERNS;

    if p.fence.is_match(text) {
        return ContentType::Code;
    }

    if contains_table(text) {
        return if p.register.is_match(text) {
            ContentType::RegisterTable
        } else if p.pin.is_match(text) {
            ContentType::PinMapping
        } else if p.electrical.is_match(text) {
            ContentType::ElectricalSpec
        } else if p.timing.is_match(text) {
            ContentType::TimingSpec
        } else {
            ContentType::Table
        };
    }

    if is_heading_only(text) {
        return ContentType::Section;
    }

    let prose_rules: [(&Regex, ContentType); 7] = [
        (&p.errata, ContentType::Errata),
        (&p.config_procedure, ContentType::ConfigProcedure),
        (&p.register, ContentType::RegisterDescription),
        (&p.timing, ContentType::TimingSpec),
        (&p.pin, ContentType::PinMapping),
        (&p.electrical, ContentType::ElectricalSpec),
        (&p.api, ContentType::ApiReference),
    ];

    prose_rules
        .into_iter()
        .find(|(re, _)| re.is_match(text))
        .map(|(_, ct)| ct)
        .unwrap_or(ContentType::Prose)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_code_wins_over_everything() {
        let text = "Set the register:\n\n```c\nRCC->AHB1ENR |= 1;\n```\n\n| a | b |\n|---|---|\n";
        assert_eq!(classify(text), ContentType::Code);
        assert_eq!(classify("~~~\nraw\n~~~"), ContentType::Code);
    }

    #[test]
    fn register_table() {
        let text = "| Offset | Register | Reset value |\n|---|---|---|\n| 0x00 | SPI_CR1 | 0x0000 |\n";
        assert_eq!(classify(text), ContentType::RegisterTable);
    }

    #[test]
    fn bit_definition_table() {
        let text = "| Bit | Name | Description |\n|---|---|---|\n| 0 | EN | Enable |\n| 1 | RST | Reset the core |\n";
        assert_eq!(classify(text), ContentType::RegisterTable);
    }

    #[test]
    fn pin_mapping_table() {
        let text = "| Pin | AF5 |\n|---|---|\n| PA5 | SPI1_SCK |\n| PA6 | SPI1_MISO |\n";
        assert_eq!(classify(text), ContentType::PinMapping);
    }

    #[test]
    fn electrical_table() {
        let text = "| Symbol | Min | Max |\n|---|---|---|\n| VDD | 1.8 V | 3.6 V |\n| IDD | - | 12 mA |\n";
        assert_eq!(classify(text), ContentType::ElectricalSpec);
    }

    #[test]
    fn timing_table() {
        let text = "| Parameter | Value |\n|---|---|\n| tSU | 5 ns |\n| fSCK | 42 MHz |\n";
        assert_eq!(classify(text), ContentType::TimingSpec);
    }

    #[test]
    fn plain_table() {
        let text = "| Name | Description |\n|---|---|\n| Foo | Something |\n";
        assert_eq!(classify(text), ContentType::Table);
    }

    #[test]
    fn heading_only_chunk_is_section() {
        assert_eq!(classify("## Functional description\n\n"), ContentType::Section);
    }

    #[test]
    fn errata_prose() {
        let text = "Known issue: the DMA request may be lost. A workaround is described below.";
        assert_eq!(classify(text), ContentType::Errata);
        assert_eq!(classify("See ES0182 for details."), ContentType::Errata);
    }

    #[test]
    fn config_procedure_prose() {
        let text = "Follow the initialization sequence. Step 1: enable the clock. The SPE bit must be set last.";
        assert_eq!(classify(text), ContentType::ConfigProcedure);
    }

    #[test]
    fn register_description_prose() {
        let text = "The control register is located at base address 0x40013000.";
        assert_eq!(classify(text), ContentType::RegisterDescription);
    }

    #[test]
    fn timing_prose() {
        let text = "The maximum SCK clock frequency is 42 MHz in master mode.";
        assert_eq!(classify(text), ContentType::TimingSpec);
    }

    #[test]
    fn pin_prose() {
        assert_eq!(
            classify("Configure PA5 as alternate function to route SCK."),
            ContentType::PinMapping
        );
    }

    #[test]
    fn electrical_prose() {
        assert_eq!(
            classify("The device operates from a 3.3V power supply."),
            ContentType::ElectricalSpec
        );
    }

    #[test]
    fn api_reference_prose() {
        let text = "Initializes the peripheral.\n\nHAL_StatusTypeDef HAL_SPI_Init(SPI_HandleTypeDef *hspi);\n";
        assert_eq!(classify(text), ContentType::ApiReference);
        assert_eq!(classify("#define SPI_MODE_MASTER"), ContentType::ApiReference);
    }

    #[test]
    fn plain_prose_fallback() {
        let text = "# SPI\n\nThe serial peripheral interface talks to external devices.";
        assert_eq!(classify(text), ContentType::Prose);
        assert_eq!(classify(""), ContentType::Prose);
    }

    #[test]
    fn table_kind_labels_require_a_table() {
        let samples = [
            "Errata sheet applies.",
            "Step 2: clear the flag.",
            "Just prose without cues.",
            "## Heading",
        ];
        for text in samples {
            assert!(!classify(text).is_table_kind(), "{text}");
        }
    }
}
