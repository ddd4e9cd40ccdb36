use super::{
    form::{FormOutcome, GeneratorForm},
    Route,
};
use crate::error::Result;
use colored::*;
use std::io::Write;

/// Dedicated generator page.
pub struct GeneratorView {
    form: GeneratorForm,
}

impl GeneratorView {
    pub fn new(form: GeneratorForm) -> Self {
        Self { form }
    }

    pub fn form(&self) -> &GeneratorForm {
        &self.form
    }

    pub fn render_header(&self) -> String {
        format!(
            "{}  {}\n\n{}\n{}",
            "← Voltar".bright_black(),
            "IsoScape".bright_cyan().bold(),
            "Crie sua ilustração agora".bold(),
            "Digite o nome de uma cidade e veja a mágica acontecer"
        )
    }

    pub fn render_footer(&self) -> String {
        format!(
            "Powered by {} • Criado com ❤️ para transformar ideias em arte",
            "Gemini AI".bright_cyan()
        )
    }

    pub async fn run<W: Write>(&self, city: &str, out: &mut W) -> Result<FormOutcome> {
        writeln!(out, "{}\n", self.render_header())?;
        let outcome = self.form.submit(city, out).await?;
        writeln!(out, "\n{}", self.render_footer())?;
        Ok(outcome)
    }

    pub fn back(&self) -> Route {
        Route::Home
    }
}
