mod mod_slider;
