/// Language of chart text, console headers, and output file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Language {
  #[default]
  #[value(name = "pt")]
  Portuguese,
  #[value(name = "en")]
  English,
}

/// Every user-facing string of one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
  pub party:      &'static str,
  pub mayors:     &'static str,
  pub councilors: &'static str,
  pub candidates: &'static str,

  pub mayors_title:      &'static str,
  pub mayors_axis:       &'static str,
  pub councilors_title:  &'static str,
  pub councilors_axis:   &'static str,
  pub parties_axis:      &'static str,
  pub correlation_title: &'static str,
  pub scatter_3d_title:  &'static str,
  /// Prefix of the boxed total in the mayors and councilors charts.
  pub elected_total:     &'static str,

  pub files: FileNames,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNames {
  pub mayors:      &'static str,
  pub councilors:  &'static str,
  pub correlation: &'static str,
  /// Static 3D scatter, written only on request.
  pub scatter_3d:  &'static str,
}

pub const PORTUGUESE: Labels = Labels {
  party:      "Partido",
  mayors:     "Prefeitos",
  councilors: "Vereadores",
  candidates: "Candidatos",

  mayors_title:      "Prefeitos eleitos no país",
  mayors_axis:       "Quantidade de prefeitos",
  councilors_title:  "Vereadores eleitos no país",
  councilors_axis:   "Quantidade de vereadores",
  parties_axis:      "Partidos",
  correlation_title: "Prefeitos vs Vereadores eleitos",
  scatter_3d_title:  "Prefeitos, vereadores e candidatos por partido",
  elected_total:     "Eleitos Brasil",

  files: FileNames {
    mayors:      "analise_prefeitos.png",
    councilors:  "analise_vereadores.png",
    correlation: "analise_correlacao.png",
    scatter_3d:  "analise_3d.png",
  },
};

pub const ENGLISH: Labels = Labels {
  party:      "Party",
  mayors:     "Mayors",
  councilors: "Councilors",
  candidates: "Candidates",

  mayors_title:      "Mayors elected in the country",
  mayors_axis:       "Number of mayors",
  councilors_title:  "Councilors elected in the country",
  councilors_axis:   "Number of councilors",
  parties_axis:      "Parties",
  correlation_title: "Elected mayors vs councilors",
  scatter_3d_title:  "Mayors, councilors and candidates per party",
  elected_total:     "Elected in Brazil",

  files: FileNames {
    mayors:      "mayors_analysis.png",
    councilors:  "councilors_analysis.png",
    correlation: "correlation_analysis.png",
    scatter_3d:  "correlation_3d.png",
  },
};

impl Language {
  pub const fn labels(self) -> &'static Labels {
    match self {
      Language::Portuguese => &PORTUGUESE,
      Language::English => &ENGLISH,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn header_columns_are_translated() {
    let pt = Language::Portuguese.labels();
    let en = Language::English.labels();
    assert_eq!([pt.party, pt.mayors, pt.councilors], ["Partido", "Prefeitos", "Vereadores"]);
    assert_ne!(pt.candidates, en.candidates);
    assert_ne!(pt.files, en.files);
  }
}
